use crate::app::Route;
use crate::models::NavLabels;
use yew::prelude::*;
use yew_router::prelude::Link;

#[derive(Properties, PartialEq)]
pub(crate) struct ShellProps {
    pub children: Children,
    pub active: Route,
    pub nav: NavLabels,
    pub signed_in: bool,
    pub locale_selector: Html,
}

#[function_component(AppShell)]
pub(crate) fn app_shell(props: &ShellProps) -> Html {
    html! {
        <div class="app-shell">
            <header class="topbar">
                <Link<Route> to={Route::Home} classes={classes!("brand")}>
                    <strong>{"DOTD"}</strong>
                    <span class="muted">{"Dress of the Day"}</span>
                </Link<Route>>
                <nav>
                    {nav_item(Route::Home, &props.nav.home, &props.active)}
                    {nav_item(Route::Feed, &props.nav.feed, &props.active)}
                    {nav_item(Route::Generate, &props.nav.generate, &props.active)}
                    {if props.signed_in {
                        nav_item(Route::MyPage, &props.nav.mypage, &props.active)
                    } else {
                        nav_item(Route::Login, &props.nav.login, &props.active)
                    }}
                </nav>
                <div class="top-actions">
                    {props.locale_selector.clone()}
                </div>
            </header>
            <main>
                {for props.children.iter()}
            </main>
        </div>
    }
}

fn nav_item(route: Route, label: &str, active: &Route) -> Html {
    let classes = classes!(
        "nav-item",
        if *active == route { Some("active") } else { None }
    );
    html! {
        <Link<Route> to={route} classes={classes}>{label}</Link<Route>>
    }
}
