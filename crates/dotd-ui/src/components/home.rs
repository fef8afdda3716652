use crate::app::Route;
use crate::components::card::CardTile;
use crate::features::listings::state::CreationCard;
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use std::rc::Rc;
use yew::prelude::*;
use yew_router::prelude::Link;

#[derive(Properties, PartialEq)]
pub(crate) struct HomeViewProps {
    pub picked: Vec<Rc<CreationCard>>,
    pub on_select: Callback<String>,
    pub on_like: Callback<String>,
}

#[function_component(HomeView)]
pub(crate) fn home_view(props: &HomeViewProps) -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));

    html! {
        <section class="home">
            <div class="hero">
                <h1>{"Dress of the Day"}</h1>
                <p class="muted">{bundle.text("home.tagline", "AI styling from your photo, one look a day.")}</p>
                <div class="actions">
                    <Link<Route> to={Route::Generate} classes={classes!("button")}>
                        {bundle.text("nav.generate", "Create")}
                    </Link<Route>>
                    <Link<Route> to={Route::Feed} classes={classes!("button", "ghost")}>
                        {bundle.text("nav.feed", "Feed")}
                    </Link<Route>>
                </div>
            </div>
            {if props.picked.is_empty() {
                html! {}
            } else {
                html! {
                    <>
                        <h2>{bundle.text("home.picked", "Editor's Picks")}</h2>
                        <div class="card-grid picked-preview">
                            {for props.picked.iter().map(|card| html! {
                                <CardTile
                                    key={card.id.clone()}
                                    card={card.clone()}
                                    on_select={props.on_select.clone()}
                                    on_like={props.on_like.clone()}
                                />
                            })}
                        </div>
                    </>
                }
            }}
        </section>
    }
}
