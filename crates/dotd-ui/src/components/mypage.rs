use crate::components::card::CardTile;
use crate::features::listings::state::CreationCard;
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use dotd_api_models::CurrentUser;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct MyPageViewProps {
    pub user: CurrentUser,
    pub cards: Vec<Rc<CreationCard>>,
    pub loading: bool,
    pub has_more: bool,
    /// Sentinel attached to the last visible card for infinite scroll.
    pub last_card: NodeRef,
    pub on_select: Callback<String>,
    pub on_like: Callback<String>,
    pub on_delete: Callback<String>,
    pub on_logout: Callback<()>,
}

#[function_component(MyPageView)]
pub(crate) fn my_page_view(props: &MyPageViewProps) -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let last_index = props.cards.len().checked_sub(1);
    let logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_| on_logout.emit(()))
    };

    html! {
        <section class="mypage">
            <header class="profile">
                {props.user.avatar.as_ref().map_or_else(
                    || html! { <span class="avatar placeholder" /> },
                    |url| html! { <img class="avatar" src={url.clone()} alt="" /> },
                )}
                <div>
                    <h1>{props.user.name.clone()}</h1>
                    {props.user.email.as_ref().map_or_else(|| html! {}, |email| html! {
                        <p class="muted">{email.clone()}</p>
                    })}
                    <p class="muted usage">
                        {format!(
                            "{}: {}/{}",
                            bundle.text("mypage.usage", "Today's Generations"),
                            props.user.daily_generations_used,
                            props.user.max_daily_generations,
                        )}
                    </p>
                </div>
                <button class="ghost" onclick={logout}>{bundle.text("mypage.logout", "Sign out")}</button>
            </header>
            <h2>{bundle.text("mypage.generated", "My Generations")}</h2>
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
                            can_delete={true}
                            on_select={props.on_select.clone()}
                            on_like={props.on_like.clone()}
                            on_delete={props.on_delete.clone()}
                            node_ref={node_ref}
                        />
                    }
                })}
            </div>
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
