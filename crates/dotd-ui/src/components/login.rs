use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct LoginViewProps {
    pub busy: bool,
    pub error: Option<String>,
    pub on_submit: Callback<(String, String)>,
}

#[function_component(LoginView)]
pub(crate) fn login_view(props: &LoginViewProps) -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let email = use_state(String::new);
    let password = use_state(String::new);

    let submit = {
        let email = email.clone();
        let password = password.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            on_submit.emit(((*email).clone(), (*password).clone()));
        })
    };

    html! {
        <section class="login">
            <h1>{bundle.text("auth.title", "Welcome back")}</h1>
            <form onsubmit={submit}>
                <label class="field">
                    <span>{bundle.text("auth.email", "Email")}</span>
                    <input type="email" required=true value={(*email).clone()} oninput={text_input(&email)} />
                </label>
                <label class="field">
                    <span>{bundle.text("auth.password", "Password")}</span>
                    <input type="password" required=true value={(*password).clone()} oninput={text_input(&password)} />
                </label>
                {props.error.as_ref().map_or_else(|| html! {}, |message| html! {
                    <p class="error" role="alert">{message.clone()}</p>
                })}
                <button type="submit" disabled={props.busy}>
                    {bundle.text("auth.submit", "Sign in")}
                </button>
            </form>
        </section>
    }
}

fn text_input(value: &UseStateHandle<String>) -> Callback<InputEvent> {
    let value = value.clone();
    Callback::from(move |event: InputEvent| {
        if let Some(target) = event
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        {
            value.set(target.value());
        }
    })
}
