use crate::components::card::CardTile;
use crate::features::listings::state::CreationCard;
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use dotd_api_models::FeedSort;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct FeedViewProps {
    pub cards: Vec<Rc<CreationCard>>,
    pub sort: FeedSort,
    pub loading: bool,
    pub has_more: bool,
    pub is_admin: bool,
    /// Sentinel attached to the last visible card for infinite scroll.
    pub last_card: NodeRef,
    pub on_sort: Callback<FeedSort>,
    pub on_select: Callback<String>,
    pub on_like: Callback<String>,
    pub on_pick: Callback<String>,
}

#[function_component(FeedView)]
pub(crate) fn feed_view(props: &FeedViewProps) -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let last_index = props.cards.len().checked_sub(1);

    html! {
        <section class="feed">
            <header class="feed-header">
                <h1>{bundle.text("feed.title", "Feed")}</h1>
                <div class="segmented">
                    {sort_tab(props, FeedSort::Latest, bundle.text("feed.latest", "Latest"))}
                    {sort_tab(props, FeedSort::Popular, bundle.text("feed.popular", "Popular"))}
                </div>
            </header>
            {if props.cards.is_empty() && !props.loading {
                html! { <p class="muted empty">{bundle.text("feed.empty", "No items in the feed yet.")}</p> }
            } else {
                html! {
                    <div class="card-grid">
                        {for props.cards.iter().enumerate().map(|(index, card)| {
                            let node_ref = if Some(index) == last_index {
                                props.last_card.clone()
                            } else {
                                NodeRef::default()
                            };
                            html! {
                                <CardTile
                                    key={card.id.clone()}
                                    card={card.clone()}
                                    is_admin={props.is_admin}
                                    on_select={props.on_select.clone()}
                                    on_like={props.on_like.clone()}
                                    on_pick={props.on_pick.clone()}
                                    node_ref={node_ref}
                                />
                            }
                        })}
                    </div>
                }
            }}
            {if props.loading {
                html! { <p class="muted marker">{bundle.text("feed.loading", "Loading more...")}</p> }
            } else if !props.has_more && !props.cards.is_empty() {
                html! { <p class="muted marker">{bundle.text("feed.end", "You've reached the end.")}</p> }
            } else {
                html! {}
            }}
        </section>
    }
}

fn sort_tab(props: &FeedViewProps, sort: FeedSort, label: String) -> Html {
    let on_sort = props.on_sort.clone();
    let onclick = Callback::from(move |_| on_sort.emit(sort));
    html! {
        <button class={classes!((props.sort == sort).then_some("active"))} {onclick}>
            {label}
        </button>
    }
}
