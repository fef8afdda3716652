use crate::features::generate::state::{GeneratePhase, GenerationParams};
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

const STYLE_PRESETS: [&str; 6] = ["casual", "street", "minimal", "formal", "vintage", "sporty"];
const COLOR_CHOICES: [&str; 8] = [
    "black", "white", "beige", "navy", "red", "green", "pink", "denim",
];
const GENDERS: [&str; 3] = ["female", "male", "unisex"];
const AGE_GROUPS: [&str; 5] = ["10s", "20s", "30s", "40s", "50s+"];

#[derive(Properties, PartialEq)]
pub(crate) struct GenerateViewProps {
    pub phase: GeneratePhase,
    pub signed_in: bool,
    /// `(used, allowed)` daily generation counters for the account.
    pub usage: Option<(u32, u32)>,
    pub on_submit: Callback<(web_sys::File, GenerationParams)>,
    pub on_publish: Callback<()>,
    pub on_reset: Callback<()>,
}

#[function_component(GenerateView)]
pub(crate) fn generate_view(props: &GenerateViewProps) -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));

    match &props.phase {
        GeneratePhase::Input => html! {
            <GenerateForm
                signed_in={props.signed_in}
                usage={props.usage}
                on_submit={props.on_submit.clone()}
            />
        },
        GeneratePhase::Submitting | GeneratePhase::Polling { .. } => html! {
            <section class="generate loading">
                <div class="spinner" aria-hidden="true" />
                <h2>{bundle.text("generate.loading_title", "Designing your look...")}</h2>
                <p class="muted">{bundle.text("generate.loading_detail", "Analyzing style trends & colors")}</p>
            </section>
        },
        GeneratePhase::Completed { outcome } => {
            let publish = {
                let on_publish = props.on_publish.clone();
                Callback::from(move |_| on_publish.emit(()))
            };
            let again = {
                let on_reset = props.on_reset.clone();
                Callback::from(move |_| on_reset.emit(()))
            };
            html! {
                <section class="generate result">
                    <img src={outcome.creation.media_url.clone()} alt={outcome.creation.prompt.clone()} />
                    {if outcome.tags.is_empty() {
                        html! {}
                    } else {
                        html! {
                            <ul class="tags">
                                {for outcome.tags.iter().map(|tag| html! { <li key={tag.clone()}>{format!("#{tag}")}</li> })}
                            </ul>
                        }
                    }}
                    {outcome.analysis.as_ref().map_or_else(|| html! {}, |analysis| html! {
                        <p class="analysis">{analysis.clone()}</p>
                    })}
                    {outcome.recommendation.as_ref().map_or_else(|| html! {}, |insight| html! {
                        <blockquote class="insight">
                            <strong>{bundle.text("generate.insight", "Trend Insight")}</strong>
                            <p>{insight.clone()}</p>
                        </blockquote>
                    })}
                    <div class="actions">
                        <button onclick={publish}>{bundle.text("generate.publish", "Upload to Feed")}</button>
                        <button class="ghost" onclick={again}>{bundle.text("generate.again", "Create Another")}</button>
                    </div>
                </section>
            }
        }
        GeneratePhase::Failed { message } => {
            let retry = {
                let on_reset = props.on_reset.clone();
                Callback::from(move |_| on_reset.emit(()))
            };
            html! {
                <section class="generate failed">
                    <h2>{bundle.text("generate.failed_title", "Generation Failed")}</h2>
                    <p class="muted">{message.clone()}</p>
                    <button onclick={retry}>{bundle.text("generate.retry", "Try Again")}</button>
                </section>
            }
        }
    }
}

#[derive(Properties, PartialEq)]
struct GenerateFormProps {
    signed_in: bool,
    usage: Option<(u32, u32)>,
    on_submit: Callback<(web_sys::File, GenerationParams)>,
}

#[function_component(GenerateForm)]
fn generate_form(props: &GenerateFormProps) -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let file_input = use_node_ref();
    let gender = use_state(|| GENDERS[0].to_string());
    let age_group = use_state(|| AGE_GROUPS[1].to_string());
    let style = use_state(String::new);
    let colors = use_state(Vec::<String>::new);
    let prompt = use_state(String::new);
    let is_public = use_state(|| true);
    let error = use_state(|| None::<String>);

    let allowance_left = props.usage.is_none_or(|(used, allowed)| used < allowed);

    let submit = {
        let file_input = file_input.clone();
        let gender = gender.clone();
        let age_group = age_group.clone();
        let style = style.clone();
        let colors = colors.clone();
        let prompt = prompt.clone();
        let is_public = is_public.clone();
        let error = error.clone();
        let on_submit = props.on_submit.clone();
        let signed_in = props.signed_in;
        let bundle = bundle.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if !signed_in {
                error.set(Some(
                    bundle.text("generate.login_required", "Please log in to generate."),
                ));
                return;
            }
            if style.is_empty() {
                error.set(Some(
                    bundle.text("generate.style_required", "Please select a style."),
                ));
                return;
            }
            let file = file_input
                .cast::<HtmlInputElement>()
                .and_then(|input| input.files())
                .and_then(|files| files.get(0));
            let Some(file) = file else {
                error.set(Some(bundle.text("generate.photo_required", "Please add a photo.")));
                return;
            };
            error.set(None);
            on_submit.emit((
                file,
                GenerationParams {
                    gender: (*gender).clone(),
                    age_group: (*age_group).clone(),
                    style: (*style).clone(),
                    colors: (*colors).clone(),
                    prompt: (*prompt).clone(),
                    is_public: *is_public,
                },
            ));
        })
    };

    let on_prompt = {
        let prompt = prompt.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(target) = event.target().and_then(|t| t.dyn_into::<HtmlTextAreaElement>().ok()) {
                prompt.set(target.value());
            }
        })
    };
    let on_public = {
        let is_public = is_public.clone();
        Callback::from(move |event: Event| {
            if let Some(target) = event.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) {
                is_public.set(target.checked());
            }
        })
    };

    html! {
        <section class="generate">
            <h1>{bundle.text("generate.title", "Create your look")}</h1>
            {props.usage.map_or_else(|| html! {}, |(used, allowed)| html! {
                <p class="muted usage">{format!("{}: {used}/{allowed}", bundle.text("mypage.usage", "Today's Generations"))}</p>
            })}
            <form onsubmit={submit}>
                <label class="field">
                    <span>{"Photo"}</span>
                    <input ref={file_input} type="file" accept="image/*" />
                </label>
                {select_field("Gender", &GENDERS, &gender)}
                {select_field("Age", &AGE_GROUPS, &age_group)}
                <div class="field chips">
                    <span>{"Style"}</span>
                    {for STYLE_PRESETS.iter().map(|preset| chip(preset, (*style).as_str() == *preset, {
                        let style = style.clone();
                        let preset = (*preset).to_string();
                        Callback::from(move |_| style.set(preset.clone()))
                    }))}
                </div>
                <div class="field chips">
                    <span>{"Colors"}</span>
                    {for COLOR_CHOICES.iter().map(|color| chip(color, colors.contains(&(*color).to_string()), {
                        let colors = colors.clone();
                        let color = (*color).to_string();
                        Callback::from(move |_| {
                            let mut next = (*colors).clone();
                            if let Some(index) = next.iter().position(|c| *c == color) {
                                next.remove(index);
                            } else {
                                next.push(color.clone());
                            }
                            colors.set(next);
                        })
                    }))}
                </div>
                <label class="field">
                    <span>{"Prompt"}</span>
                    <textarea value={(*prompt).clone()} oninput={on_prompt} rows="3" />
                </label>
                <label class="field inline">
                    <input type="checkbox" checked={*is_public} onchange={on_public} />
                    <span>{"Share to the public feed"}</span>
                </label>
                {error.as_ref().map_or_else(|| html! {}, |message| html! {
                    <p class="error" role="alert">{message.clone()}</p>
                })}
                <button type="submit" disabled={!allowance_left}>
                    {bundle.text("generate.submit", "Generate")}
                </button>
            </form>
        </section>
    }
}

fn select_field(label: &str, options: &[&str], value: &UseStateHandle<String>) -> Html {
    let onchange = {
        let value = value.clone();
        Callback::from(move |event: Event| {
            if let Some(target) = event.target().and_then(|t| t.dyn_into::<HtmlSelectElement>().ok()) {
                value.set(target.value());
            }
        })
    };
    html! {
        <label class="field">
            <span>{label}</span>
            <select {onchange}>
                {for options.iter().map(|option| html! {
                    <option value={(*option).to_string()} selected={(**value).as_str() == *option}>{*option}</option>
                })}
            </select>
        </label>
    }
}

fn chip(label: &str, active: bool, onclick: Callback<MouseEvent>) -> Html {
    html! {
        <button type="button" class={classes!("chip", active.then_some("active"))} {onclick}>
            {label}
        </button>
    }
}
