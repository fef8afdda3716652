use crate::features::listings::state::CreationCard;
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct DetailModalProps {
    pub card: Rc<CreationCard>,
    pub is_admin: bool,
    pub can_delete: bool,
    pub on_close: Callback<()>,
    pub on_like: Callback<String>,
    pub on_pick: Callback<String>,
    pub on_delete: Callback<String>,
}

#[function_component(DetailModal)]
pub(crate) fn detail_modal(props: &DetailModalProps) -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let card = &props.card;
    let id = card.id.clone();

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };
    let like = emit_id(&props.on_like, &id);
    let pick = emit_id(&props.on_pick, &id);
    let delete = emit_id(&props.on_delete, &id);
    let keep_open = Callback::from(|event: MouseEvent| event.stop_propagation());

    html! {
        <div class="modal-backdrop" onclick={close.clone()}>
            <div class="modal detail" role="dialog" aria-modal="true" onclick={keep_open}>
                <button class="ghost close" aria-label="Close" onclick={close}>{"✕"}</button>
                <img src={card.media_url.clone()} alt={card.prompt.clone()} />
                <div class="detail-body">
                    <div class="author">
                        <span>{card.author_name.clone()}</span>
                        {if card.is_picked { html! { <span class="pick-badge">{"PICK"}</span> } } else { html! {} }}
                    </div>
                    <p class="prompt">{card.prompt.clone()}</p>
                    {if card.tags.is_empty() {
                        html! {}
                    } else {
                        html! {
                            <ul class="tags">
                                {for card.tags.iter().map(|tag| html! { <li key={tag.clone()}>{format!("#{tag}")}</li> })}
                            </ul>
                        }
                    }}
                    {card.insight.as_ref().map_or_else(|| html! {}, |insight| html! {
                        <blockquote class="insight">
                            <strong>{bundle.text("generate.insight", "Trend Insight")}</strong>
                            <p>{insight.clone()}</p>
                        </blockquote>
                    })}
                    <div class="actions">
                        <button class={classes!("like", card.is_liked.then_some("liked"))} onclick={like}>
                            {if card.is_liked { "♥" } else { "♡" }}
                            <span class="count">{card.likes_count}</span>
                        </button>
                        {if props.is_admin {
                            html! { <button class="ghost" onclick={pick}>{if card.is_picked { "Unpick" } else { "Pick" }}</button> }
                        } else {
                            html! {}
                        }}
                        {if props.can_delete {
                            html! { <button class="ghost danger" onclick={delete}>{"Delete"}</button> }
                        } else {
                            html! {}
                        }}
                    </div>
                </div>
            </div>
        </div>
    }
}

fn emit_id(callback: &Callback<String>, id: &str) -> Callback<MouseEvent> {
    let callback = callback.clone();
    let id = id.to_string();
    Callback::from(move |_| callback.emit(id.clone()))
}
