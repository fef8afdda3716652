//! Routing definitions for the DOTD UI.
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub(crate) enum Route {
    #[at("/")]
    Home,
    #[at("/feed")]
    Feed,
    #[at("/generate")]
    Generate,
    #[at("/me")]
    MyPage,
    #[at("/login")]
    Login,
    #[not_found]
    #[at("/404")]
    NotFound,
}
