use crate::features::listings::state::CreationCard;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct CardTileProps {
    pub card: Rc<CreationCard>,
    #[prop_or_default]
    pub is_admin: bool,
    #[prop_or_default]
    pub can_delete: bool,
    pub on_select: Callback<String>,
    pub on_like: Callback<String>,
    #[prop_or_default]
    pub on_pick: Callback<String>,
    #[prop_or_default]
    pub on_delete: Callback<String>,
    #[prop_or_default]
    pub node_ref: NodeRef,
}

#[function_component(CardTile)]
pub(crate) fn card_tile(props: &CardTileProps) -> Html {
    let card = &props.card;
    let id = card.id.clone();

    let open = {
        let on_select = props.on_select.clone();
        let id = id.clone();
        Callback::from(move |_| on_select.emit(id.clone()))
    };
    let like = bubble_action(&props.on_like, &id);
    let pick = bubble_action(&props.on_pick, &id);
    let delete = bubble_action(&props.on_delete, &id);

    html! {
        <article class={classes!("card-tile", card.is_picked.then_some("picked"))} ref={props.node_ref.clone()}>
            <button class="media" onclick={open}>
                <img src={card.media_url.clone()} alt={card.prompt.clone()} loading="lazy" />
                {if card.is_picked {
                    html! { <span class="pick-badge">{"PICK"}</span> }
                } else {
                    html! {}
                }}
            </button>
            <footer>
                <div class="author">
                    {avatar(card)}
                    <span>{card.author_name.clone()}</span>
                </div>
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
            </footer>
        </article>
    }
}

fn bubble_action(callback: &Callback<String>, id: &str) -> Callback<MouseEvent> {
    let callback = callback.clone();
    let id = id.to_string();
    Callback::from(move |event: MouseEvent| {
        event.stop_propagation();
        callback.emit(id.clone());
    })
}

fn avatar(card: &CreationCard) -> Html {
    card.author_avatar.as_ref().map_or_else(
        || html! { <span class="avatar placeholder" /> },
        |url| html! { <img class="avatar" src={url.clone()} alt="" /> },
    )
}
