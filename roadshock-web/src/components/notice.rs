use yew::prelude::*;

use crate::components::button::Button;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub message: AttrValue,
    #[prop_or_default]
    pub on_dismiss: Option<Callback<()>>,
}

/// Inline alert. Dismissible only when a callback is supplied.
#[function_component(Notice)]
pub fn notice(p: &Props) -> Html {
    html! {
        <div class="notice" role="alert">
            <span class="notice-text">{ p.message.clone() }</span>
            {
                p.on_dismiss.clone().map_or_else(Html::default, |cb| html! {
                    <Button label="Dismiss" class={classes!("notice-dismiss")} onclick={cb} />
                })
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use yew::LocalServerRenderer;

    #[test]
    fn dismiss_button_only_when_dismissible() {
        let sticky = Props {
            message: AttrValue::from("Select a city first."),
            on_dismiss: None,
        };
        let html = block_on(LocalServerRenderer::<Notice>::with_props(sticky).render());
        assert!(html.contains("Select a city first."));
        assert!(!html.contains("Dismiss"));

        let dismissible = Props {
            message: AttrValue::from("Simulation failed"),
            on_dismiss: Some(Callback::noop()),
        };
        let html = block_on(LocalServerRenderer::<Notice>::with_props(dismissible).render());
        assert!(html.contains("Dismiss"));
    }
}
