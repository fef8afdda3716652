use crate::app::observer::NearEndObserver;
use crate::app::poller::{PollHandle, start_status_polling};
use crate::components::detail::DetailModal;
use crate::components::feed::FeedView;
use crate::components::generate::GenerateView;
use crate::components::home::HomeView;
use crate::components::login::LoginView;
use crate::components::mypage::MyPageView;
use crate::components::shell::AppShell;
use crate::components::toast::ToastHost;
use crate::core::auth::{ActionGate, SessionState, authorize};
use crate::core::store::AppStore;
use crate::features::generate::state::{
    self as generate_state, GeneratePhase, GenerationParams,
};
use crate::features::listings::actions::{
    ListingAction, access_rule, delete_confirm_message, failure_message,
};
use crate::features::listings::mutations::{
    begin_delete, begin_like, begin_pick, finish_delete, finish_like, finish_pick, revert_like,
    revert_pick,
};
use crate::features::listings::state::{
    ListingScope, apply_page, begin_fetch, card, page_failed, prepend_card, reset_listing,
    select_card, selected_card, set_feed_sort, visible_cards,
};
use crate::i18n::{LocaleCode, TranslationBundle};
use crate::models::{NavLabels, Toast, ToastKind};
use crate::services::api::{ApiClient, ApiCtx};
use dotd_api_models::FeedSort;
use gloo::dialogs::confirm;
use preferences::{api_base_url, clear_token, load_locale, load_token, persist_locale, persist_token};
pub(crate) use routes::Route;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::Element;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

mod observer;
mod poller;
mod preferences;
mod routes;

#[function_component(DotdApp)]
pub fn dotd_app() -> Html {
    html! {
        <BrowserRouter>
            <AppRoot />
        </BrowserRouter>
    }
}

#[function_component(AppRoot)]
fn app_root() -> Html {
    let locale = use_state(load_locale);
    let dispatch = Dispatch::<AppStore>::new();
    let api_ctx = use_memo(|_| ApiCtx::new(api_base_url()), ());
    let toasts = use_state(Vec::<Toast>::new);
    let toast_id = use_state(|| 0u64);
    let poll_slot = use_mut_ref(|| None as Option<PollHandle>);
    let feed_observer = use_mut_ref(|| None as Option<NearEndObserver>);
    let mine_observer = use_mut_ref(|| None as Option<NearEndObserver>);
    let feed_last = use_node_ref();
    let mine_last = use_node_ref();
    let navigator = use_navigator();
    let current_route = use_route::<Route>().unwrap_or(Route::Home);
    let bundle = {
        let locale = *locale;
        use_memo(move |_| TranslationBundle::new(locale), locale)
    };

    let session = use_selector(|store: &AppStore| store.session.clone());
    let feed_cards = use_selector(|store: &AppStore| {
        visible_cards(&store.listings, ListingScope::Feed)
    });
    let mine_cards = use_selector(|store: &AppStore| {
        visible_cards(&store.listings, ListingScope::Mine)
    });
    let picked_cards = use_selector(|store: &AppStore| {
        visible_cards(&store.listings, ListingScope::Picked)
    });
    let feed_cursor = use_selector(|store: &AppStore| store.listings.feed.cursor);
    let mine_cursor = use_selector(|store: &AppStore| store.listings.mine.cursor);
    let feed_sort = use_selector(|store: &AppStore| store.listings.feed_sort);
    let selected = use_selector(|store: &AppStore| selected_card(&store.listings));
    let generate_phase = use_selector(|store: &AppStore| store.generate.phase.clone());

    let session_value = (*session).clone();
    let feed_sort_value = *feed_sort;
    let phase_value = (*generate_phase).clone();
    let signed_in = session_value.state.is_signed_in();
    let is_admin = session_value.state.is_admin();

    let notify = {
        let toasts = toasts.clone();
        let toast_id = toast_id.clone();
        Callback::from(move |(kind, message): (ToastKind, String)| {
            push_toast(&toasts, &toast_id, kind, message);
        })
    };

    // Resolve the stored token into an identity once per boot.
    {
        let dispatch = dispatch.clone();
        let api_ctx = (*api_ctx).clone();
        use_effect_with_deps(
            move |_| {
                if let Some(token) = load_token() {
                    api_ctx.client.set_token(Some(token));
                    let client = api_ctx.client.clone();
                    yew::platform::spawn_local(async move {
                        match client.fetch_me().await {
                            Ok(Some(user)) => dispatch.reduce_mut(|store| {
                                store.session.resolve(SessionState::SignedIn(user));
                            }),
                            Ok(None) => {
                                clear_token();
                                client.set_token(None);
                                dispatch.reduce_mut(|store| {
                                    store.session.resolve(SessionState::Guest);
                                });
                            }
                            Err(_) => dispatch.reduce_mut(|store| {
                                store.session.resolve(SessionState::Guest);
                            }),
                        }
                    });
                } else {
                    dispatch.reduce_mut(|store| store.session.resolve(SessionState::Guest));
                }
                || ()
            },
            (),
        );
    }

    // First feed page, and a fresh one on every sort change.
    {
        let dispatch = dispatch.clone();
        let api_ctx = (*api_ctx).clone();
        let notify = notify.clone();
        let bundle = (*bundle).clone();
        use_effect_with_deps(
            move |_sort| {
                load_page(
                    &dispatch,
                    &api_ctx.client,
                    ListingScope::Feed,
                    &notify,
                    Some(bundle.text("toast.feed_failed", "Failed to load the feed.")),
                );
                || ()
            },
            feed_sort_value,
        );
    }

    // Home preview of admin picks; a failure leaves the section empty.
    {
        let dispatch = dispatch.clone();
        let api_ctx = (*api_ctx).clone();
        let notify = notify.clone();
        use_effect_with_deps(
            move |_| {
                load_page(&dispatch, &api_ctx.client, ListingScope::Picked, &notify, None);
                || ()
            },
            (),
        );
    }

    // My-page listing follows the identity.
    {
        let dispatch = dispatch.clone();
        let api_ctx = (*api_ctx).clone();
        let notify = notify.clone();
        let bundle = (*bundle).clone();
        use_effect_with_deps(
            move |signed_in| {
                dispatch.reduce_mut(|store| reset_listing(&mut store.listings, ListingScope::Mine));
                if *signed_in {
                    load_page(
                        &dispatch,
                        &api_ctx.client,
                        ListingScope::Mine,
                        &notify,
                        Some(bundle.text(
                            "mypage.load_failed",
                            "Failed to load your creations. Please try again later.",
                        )),
                    );
                }
                || ()
            },
            signed_in,
        );
    }

    let load_more_feed = {
        let dispatch = dispatch.clone();
        let api_ctx = (*api_ctx).clone();
        let notify = notify.clone();
        let bundle = (*bundle).clone();
        Callback::from(move |()| {
            load_page(
                &dispatch,
                &api_ctx.client,
                ListingScope::Feed,
                &notify,
                Some(bundle.text("toast.feed_failed", "Failed to load the feed.")),
            );
        })
    };
    let load_more_mine = {
        let dispatch = dispatch.clone();
        let api_ctx = (*api_ctx).clone();
        let notify = notify.clone();
        let bundle = (*bundle).clone();
        Callback::from(move |()| {
            load_page(
                &dispatch,
                &api_ctx.client,
                ListingScope::Mine,
                &notify,
                Some(bundle.text(
                    "mypage.load_failed",
                    "Failed to load your creations. Please try again later.",
                )),
            );
        })
    };

    // Re-attach the scroll sentinels whenever a listing grows or the
    // locale switches (the callback bakes in localized failure toasts).
    use_near_end_observer(
        feed_observer.clone(),
        feed_last.clone(),
        load_more_feed,
        feed_cards.len(),
        *locale,
    );
    use_near_end_observer(
        mine_observer.clone(),
        mine_last.clone(),
        load_more_mine,
        mine_cards.len(),
        *locale,
    );

    // The poll loop lives exactly as long as the polling phase.
    {
        let poll_slot = poll_slot.clone();
        let dispatch = dispatch.clone();
        let api_ctx = (*api_ctx).clone();
        use_effect_with_deps(
            move |phase: &GeneratePhase| {
                match phase {
                    GeneratePhase::Polling { .. } => {
                        if poll_slot.borrow().is_none() {
                            start_status_polling(&dispatch, &api_ctx.client, &poll_slot);
                        }
                    }
                    _ => {
                        poll_slot.borrow_mut().take();
                    }
                }
                || ()
            },
            phase_value.clone(),
        );
    }

    let on_sort = {
        let dispatch = dispatch.clone();
        Callback::from(move |sort: FeedSort| {
            dispatch.reduce_mut(|store| {
                set_feed_sort(&mut store.listings, sort);
            });
        })
    };
    let on_select = {
        let dispatch = dispatch.clone();
        Callback::from(move |id: String| {
            dispatch.reduce_mut(|store| select_card(&mut store.listings, Some(id.clone())));
        })
    };
    let on_close_detail = {
        let dispatch = dispatch.clone();
        Callback::from(move |()| {
            dispatch.reduce_mut(|store| select_card(&mut store.listings, None));
        })
    };

    let on_like = {
        let dispatch = dispatch.clone();
        let api_ctx = (*api_ctx).clone();
        let notify = notify.clone();
        let bundle = (*bundle).clone();
        let navigator = navigator.clone();
        Callback::from(move |id: String| {
            let store = dispatch.get();
            let Some(target) = card(&store.listings, &id) else {
                return;
            };
            match authorize(
                &store.session.state,
                access_rule(ListingAction::ToggleLike, &target),
            ) {
                ActionGate::Allowed => {}
                ActionGate::NeedsLogin => {
                    if let Some(navigator) = navigator.as_ref() {
                        navigator.push(&Route::Login);
                    }
                    return;
                }
                ActionGate::Forbidden => return,
            }
            let mut direction = None;
            dispatch.reduce_mut(|store| direction = begin_like(&mut store.listings, &id));
            let Some(direction) = direction else {
                return;
            };
            let dispatch = dispatch.clone();
            let client = api_ctx.client.clone();
            let notify = notify.clone();
            let message = failure_message(&bundle, ListingAction::ToggleLike);
            yew::platform::spawn_local(async move {
                match client.set_like(&id, direction).await {
                    Ok(()) => dispatch.reduce_mut(|store| finish_like(&mut store.listings, &id)),
                    Err(_) => {
                        dispatch.reduce_mut(|store| revert_like(&mut store.listings, &id));
                        notify.emit((ToastKind::Error, message));
                    }
                }
            });
        })
    };

    let on_pick = {
        let dispatch = dispatch.clone();
        let api_ctx = (*api_ctx).clone();
        let notify = notify.clone();
        let bundle = (*bundle).clone();
        Callback::from(move |id: String| {
            let store = dispatch.get();
            let Some(target) = card(&store.listings, &id) else {
                return;
            };
            if authorize(
                &store.session.state,
                access_rule(ListingAction::TogglePick, &target),
            ) != ActionGate::Allowed
            {
                return;
            }
            let mut started = false;
            dispatch.reduce_mut(|store| started = begin_pick(&mut store.listings, &id));
            if !started {
                return;
            }
            let dispatch = dispatch.clone();
            let client = api_ctx.client.clone();
            let notify = notify.clone();
            let message = failure_message(&bundle, ListingAction::TogglePick);
            yew::platform::spawn_local(async move {
                match client.toggle_pick(&id).await {
                    Ok(()) => dispatch.reduce_mut(|store| finish_pick(&mut store.listings, &id)),
                    Err(_) => {
                        dispatch.reduce_mut(|store| revert_pick(&mut store.listings, &id));
                        notify.emit((ToastKind::Error, message));
                    }
                }
            });
        })
    };

    let on_delete = {
        let dispatch = dispatch.clone();
        let api_ctx = (*api_ctx).clone();
        let notify = notify.clone();
        let bundle = (*bundle).clone();
        Callback::from(move |id: String| {
            let store = dispatch.get();
            let Some(target) = card(&store.listings, &id) else {
                return;
            };
            if authorize(
                &store.session.state,
                access_rule(ListingAction::Delete, &target),
            ) != ActionGate::Allowed
            {
                return;
            }
            if !confirm(&delete_confirm_message(&bundle)) {
                return;
            }
            let mut started = false;
            dispatch.reduce_mut(|store| started = begin_delete(&mut store.listings, &id));
            if !started {
                return;
            }
            let dispatch = dispatch.clone();
            let client = api_ctx.client.clone();
            let notify = notify.clone();
            let failed = failure_message(&bundle, ListingAction::Delete);
            let deleted = bundle.text("toast.deleted", "Creation deleted.");
            yew::platform::spawn_local(async move {
                match client.delete_creation(&id).await {
                    Ok(()) => {
                        dispatch
                            .reduce_mut(|store| finish_delete(&mut store.listings, &id, true));
                        notify.emit((ToastKind::Success, deleted));
                    }
                    Err(_) => {
                        dispatch
                            .reduce_mut(|store| finish_delete(&mut store.listings, &id, false));
                        notify.emit((ToastKind::Error, failed));
                    }
                }
            });
        })
    };

    let on_login = {
        let dispatch = dispatch.clone();
        let api_ctx = (*api_ctx).clone();
        let bundle = (*bundle).clone();
        let navigator = navigator.clone();
        Callback::from(move |(email, password): (String, String)| {
            dispatch.reduce_mut(|store| {
                store.session.busy = true;
                store.session.error = None;
            });
            let dispatch = dispatch.clone();
            let client = api_ctx.client.clone();
            let navigator = navigator.clone();
            let failed = bundle.text("auth.failed", "Failed to log in.");
            yew::platform::spawn_local(async move {
                let resolved = match client.login(&email, &password).await {
                    Ok(token) => {
                        persist_token(&token);
                        client.fetch_me().await.ok().flatten()
                    }
                    Err(_) => None,
                };
                match resolved {
                    Some(user) => {
                        dispatch.reduce_mut(|store| {
                            store.session.resolve(SessionState::SignedIn(user));
                        });
                        if let Some(navigator) = navigator.as_ref() {
                            navigator.push(&Route::Home);
                        }
                    }
                    None => dispatch.reduce_mut(|store| {
                        store.session.busy = false;
                        store.session.error = Some(failed.clone());
                    }),
                }
            });
        })
    };

    let on_logout = {
        let dispatch = dispatch.clone();
        let api_ctx = (*api_ctx).clone();
        let navigator = navigator.clone();
        Callback::from(move |()| {
            clear_token();
            api_ctx.client.set_token(None);
            dispatch.reduce_mut(|store| store.session.sign_out());
            if let Some(navigator) = navigator.as_ref() {
                navigator.push(&Route::Home);
            }
        })
    };

    let on_generate_submit = {
        let dispatch = dispatch.clone();
        let api_ctx = (*api_ctx).clone();
        Callback::from(move |(file, params): (web_sys::File, GenerationParams)| {
            let mut started = false;
            dispatch.reduce_mut(|store| started = generate_state::begin_submit(&mut store.generate));
            if !started {
                return;
            }
            let dispatch = dispatch.clone();
            let client = api_ctx.client.clone();
            yew::platform::spawn_local(async move {
                match client.submit_generation(&file, &params).await {
                    Ok(task_id) => dispatch.reduce_mut(|store| {
                        generate_state::submit_ok(&mut store.generate, task_id);
                    }),
                    Err(err) => dispatch.reduce_mut(|store| {
                        generate_state::submit_failed(&mut store.generate, Some(err.to_string()));
                    }),
                }
            });
        })
    };
    let on_generate_reset = {
        let dispatch = dispatch.clone();
        Callback::from(move |()| {
            dispatch.reduce_mut(|store| generate_state::cancel(&mut store.generate));
        })
    };
    let on_publish = {
        let dispatch = dispatch.clone();
        let notify = notify.clone();
        let bundle = (*bundle).clone();
        Callback::from(move |()| {
            let store = dispatch.get();
            let GeneratePhase::Completed { outcome } = &store.generate.phase else {
                return;
            };
            let fresh = outcome.creation.clone();
            dispatch.reduce_mut(|store| {
                prepend_card(&mut store.listings, ListingScope::Feed, fresh.clone());
            });
            notify.emit((
                ToastKind::Success,
                bundle.text("toast.published", "Uploaded to Feed!"),
            ));
        })
    };
    let dismiss_toast = {
        let toasts = toasts.clone();
        Callback::from(move |id: u64| {
            toasts.set(
                (*toasts)
                    .iter()
                    .cloned()
                    .filter(|toast| toast.id != id)
                    .collect(),
            );
        })
    };

    let nav_labels = NavLabels {
        home: bundle.text("nav.home", "Home"),
        feed: bundle.text("nav.feed", "Feed"),
        generate: bundle.text("nav.generate", "Create"),
        mypage: bundle.text("nav.mypage", "My Page"),
        login: bundle.text("nav.login", "Login"),
    };
    let locale_selector = {
        let locale = locale.clone();
        html! {
            <select value={locale.code().to_string()} onchange={{
                let locale = locale.clone();
                Callback::from(move |event: Event| {
                    let Some(target) = event
                        .target()
                        .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
                    else {
                        return;
                    };
                    if let Some(next) = LocaleCode::from_lang_tag(&target.value()) {
                        persist_locale(next);
                        locale.set(next);
                    }
                })
            }}>
                {for LocaleCode::all().iter().map(|lc| html! {
                    <option value={lc.code()} selected={*lc == *locale}>{lc.label()}</option>
                })}
            </select>
        }
    };

    let usage = session_value
        .state
        .user()
        .map(|user| (user.daily_generations_used, user.max_daily_generations));
    let detail_modal = (*selected).as_ref().map_or_else(
        || html! {},
        |card| {
            let can_delete = authorize(
                &session_value.state,
                access_rule(ListingAction::Delete, card),
            ) == ActionGate::Allowed;
            html! {
                <DetailModal
                    card={card.clone()}
                    is_admin={is_admin}
                    can_delete={can_delete}
                    on_close={on_close_detail.clone()}
                    on_like={on_like.clone()}
                    on_pick={on_pick.clone()}
                    on_delete={on_delete.clone()}
                />
            }
        },
    );

    let page = match current_route.clone() {
        Route::Home => html! {
            <HomeView
                picked={(*picked_cards).clone()}
                on_select={on_select.clone()}
                on_like={on_like.clone()}
            />
        },
        Route::Feed => html! {
            <FeedView
                cards={(*feed_cards).clone()}
                sort={feed_sort_value}
                loading={feed_cursor.loading}
                has_more={feed_cursor.has_more}
                is_admin={is_admin}
                last_card={feed_last.clone()}
                on_sort={on_sort.clone()}
                on_select={on_select.clone()}
                on_like={on_like.clone()}
                on_pick={on_pick.clone()}
            />
        },
        Route::Generate => html! {
            <GenerateView
                phase={phase_value.clone()}
                signed_in={signed_in}
                usage={usage}
                on_submit={on_generate_submit.clone()}
                on_publish={on_publish.clone()}
                on_reset={on_generate_reset.clone()}
            />
        },
        Route::MyPage => session_value.state.user().map_or_else(
            || html! { <Redirect<Route> to={Route::Login} /> },
            |user| html! {
                <MyPageView
                    user={user.clone()}
                    cards={(*mine_cards).clone()}
                    loading={mine_cursor.loading}
                    has_more={mine_cursor.has_more}
                    last_card={mine_last.clone()}
                    on_select={on_select.clone()}
                    on_like={on_like.clone()}
                    on_delete={on_delete.clone()}
                    on_logout={on_logout.clone()}
                />
            },
        ),
        Route::Login => {
            if signed_in {
                html! { <Redirect<Route> to={Route::Home} /> }
            } else {
                html! {
                    <LoginView
                        busy={session_value.busy}
                        error={session_value.error.clone()}
                        on_submit={on_login.clone()}
                    />
                }
            }
        }
        Route::NotFound => html! {
            <div class="placeholder">
                <h2>{"404"}</h2>
                <p class="muted">{"This page does not exist."}</p>
            </div>
        },
    };

    html! {
        <ContextProvider<ApiCtx> context={(*api_ctx).clone()}>
            <ContextProvider<TranslationBundle> context={(*bundle).clone()}>
                <AppShell
                    active={current_route}
                    nav={nav_labels}
                    signed_in={signed_in}
                    locale_selector={locale_selector}
                >
                    {page}
                </AppShell>
                {detail_modal}
                <ToastHost toasts={(*toasts).clone()} on_dismiss={dismiss_toast} />
            </ContextProvider<TranslationBundle>>
        </ContextProvider<ApiCtx>>
    }
}

fn load_page(
    dispatch: &Dispatch<AppStore>,
    client: &Rc<ApiClient>,
    scope: ListingScope,
    notify: &Callback<(ToastKind, String)>,
    failure: Option<String>,
) {
    let mut request = None;
    dispatch.reduce_mut(|store| request = begin_fetch(&mut store.listings, scope));
    let Some(request) = request else {
        return;
    };
    let dispatch = dispatch.clone();
    let client = client.clone();
    let notify = notify.clone();
    yew::platform::spawn_local(async move {
        let sort = dispatch.get().listings.feed_sort;
        let result = match scope {
            ListingScope::Feed => client.fetch_feed_page(sort, &request).await,
            ListingScope::Mine => client.fetch_my_page(&request).await,
            ListingScope::Picked => client.fetch_picked(request.limit).await,
        };
        match result {
            Ok(cards) => dispatch.reduce_mut(|store| {
                apply_page(&mut store.listings, scope, request, cards);
            }),
            Err(_) => {
                dispatch.reduce_mut(|store| page_failed(&mut store.listings, scope, request));
                if let Some(message) = failure {
                    notify.emit((ToastKind::Error, message));
                }
            }
        }
    });
}

#[hook]
fn use_near_end_observer(
    slot: Rc<RefCell<Option<NearEndObserver>>>,
    sentinel: NodeRef,
    on_near_end: Callback<()>,
    visible_len: usize,
    locale: LocaleCode,
) {
    use_effect_with_deps(
        move |_| {
            // Rebuild rather than reuse: the stored callback must track the
            // latest render's captures (the active translation bundle).
            *slot.borrow_mut() = NearEndObserver::new(on_near_end);
            if let Some(element) = sentinel.cast::<Element>() {
                let mut observer = slot.borrow_mut();
                if let Some(observer) = observer.as_mut() {
                    observer.watch(element);
                }
            }
            || ()
        },
        (visible_len, locale),
    );
}

fn push_toast(
    toasts: &UseStateHandle<Vec<Toast>>,
    next_id: &UseStateHandle<u64>,
    kind: ToastKind,
    message: String,
) {
    let id = **next_id + 1;
    next_id.set(id);
    let mut list = (**toasts).clone();
    list.push(Toast { id, message, kind });
    if list.len() > 4 {
        let drain = list.len() - 4;
        list.drain(0..drain);
    }
    toasts.set(list);
}

/// Entrypoint invoked by Trunk for wasm32 builds.
pub fn run_app() {
    console_error_panic_hook::set_once();
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<DotdApp>::with_root(root).render();
    } else {
        yew::Renderer::<DotdApp>::new().render();
    }
}
