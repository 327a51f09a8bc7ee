use evogames::fmt::strategy_display_name;
use evogames::form::{parameter_fields, FormState};
use evogames::model::{DilemmaKind, Distribution, Results, SimulationConfig};
use evogames::notice::{Level, Notice};
use evogames::playback::PlaybackState;
use evogames::present::table::Indicator;
use evogames::present::Frame;
use evogames::session::Session;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::ui_model::{
    indicator_class, parameter_input_id, parameter_label, parameter_step, row_class,
    strategy_input_id, tone_class, Controls, CHART_CANVAS_IDS, CONFIG_SCRIPT_ID,
    RESULTS_SCRIPT_ID, SPEED_OPTIONS,
};

mod backend;
mod canvas;
mod scheduler;
mod storage;

use canvas::CanvasRenderer;
use scheduler::IntervalScheduler;

type WebSession = Session<IntervalScheduler, CanvasRenderer>;

const TOAST_MS: i32 = 4000;

/// Mount the app once the document has finished parsing, so the embedded
/// results blocks are readable.
pub fn start() {
    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = document_ready().await {
            web_sys::console::error_2(&JsValue::from_str("document never became ready"), &e);
            return;
        }
        mount_to_body(|| view! { <App /> });
    });
}

async fn document_ready() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    if document.ready_state() != "loading" {
        return Ok(());
    }
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let _ = document.add_event_listener_with_callback("DOMContentLoaded", &resolve);
    });
    JsFuture::from(promise).await.map(|_| ())
}

fn embedded_json(id: &str) -> Option<String> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .text_content()
        .filter(|t| !t.trim().is_empty())
}

/// Results and config the server rendered into the page, if any.
fn embedded_run() -> Option<(Results, SimulationConfig)> {
    let results = embedded_json(RESULTS_SCRIPT_ID)?;
    let config = embedded_json(CONFIG_SCRIPT_ID)?;
    match (
        Results::from_json(&results),
        SimulationConfig::from_json(&config),
    ) {
        (Ok(results), Ok(config)) => Some((results, config)),
        (Err(e), _) | (_, Err(e)) => {
            web_sys::console::warn_1(&JsValue::from_str(&format!("embedded run unreadable: {e}")));
            None
        }
    }
}

fn query_kind() -> Option<DilemmaKind> {
    let search = web_sys::window()?.location().search().ok()?;
    DilemmaKind::from_query(&search)
}

#[component]
fn App() -> impl IntoView {
    let mut initial = FormState::new();
    if let Some(kind) = query_kind() {
        initial.kind = kind;
    }
    let (form, set_form) = signal(initial);
    let (notice, set_notice) = signal::<Option<(u32, Notice)>>(None);

    let show_notice = move |n: Notice| {
        let seq = notice.with_untracked(|cur| cur.as_ref().map_or(0, |(s, _)| s + 1));
        set_notice.set(Some((seq, n)));
        let hide = Closure::once_into_js(move || {
            if notice.with_untracked(|cur| cur.as_ref().map(|(s, _)| *s)) == Some(seq) {
                set_notice.set(None);
            }
        });
        if let Some(w) = web_sys::window() {
            let _ = w
                .set_timeout_with_callback_and_timeout_and_arguments_0(hide.unchecked_ref(), TOAST_MS);
        }
    };

    let do_save = move || match form.with_untracked(FormState::submit) {
        Ok(config) => wasm_bindgen_futures::spawn_local(async move {
            show_notice(backend::save_config(&config).await);
        }),
        Err(e) => show_notice(Notice::from(&e)),
    };

    let do_run = move || match form.with_untracked(FormState::submit) {
        Ok(config) => {
            show_notice(Notice::running());
            if let Err(e) = backend::submit_simulation(&config) {
                web_sys::console::error_1(&JsValue::from_str(&e));
                show_notice(Notice::new("Error", e, Level::Danger));
            }
        }
        Err(e) => show_notice(Notice::from(&e)),
    };

    let (frame, set_frame) = signal::<Option<Frame>>(None);
    let (controls, set_controls) = signal(Controls::for_state(PlaybackState::Idle, 0, 0));
    let (speed, set_speed) = signal(storage::load_speed());
    let session = StoredValue::new_local(None::<WebSession>);

    let sync_controls = move || {
        let next = session.with_value(|s| {
            s.as_ref().map(|s| {
                Controls::for_state(s.state(), s.playback().cursor(), s.playback().total())
            })
        });
        set_controls.set(next.unwrap_or(Controls::for_state(PlaybackState::Idle, 0, 0)));
    };

    let act = move |op: fn(&mut WebSession) -> bool| {
        session.update_value(|s| {
            if let Some(s) = s.as_mut() {
                op(s);
            }
        });
        sync_controls();
    };

    let change_speed = move |ms: u32| {
        set_speed.set(ms);
        storage::save_speed(ms);
        session.update_value(|s| {
            if let Some(s) = s.as_mut() {
                s.set_interval(ms);
            }
        });
        sync_controls();
    };

    if let Some((results, config)) = embedded_run() {
        let scheduler = IntervalScheduler::new(move || act(WebSession::tick));
        let mut s = Session::new(scheduler, CanvasRenderer::new(set_frame));
        s.set_interval(speed.get_untracked());
        s.load(results, config);
        session.set_value(Some(s));
        sync_controls();
    }
    let has_results = session.with_value(Option::is_some);

    on_cleanup(move || {
        session.update_value(|s| {
            if let Some(mut s) = s.take() {
                s.dispose();
            }
        });
    });

    Effect::new(move |_| {
        frame.with(|f| {
            if let Some(f) = f {
                canvas::paint_frame(f);
            }
        });
    });

    view! {
        <main class="container my-4">
            <h1>"Social Dilemma Simulation"</h1>

            <section id="config-form" class="card p-3 mb-4">
                <div class="mb-2">
                    <label class="form-label">
                        "Configuration Name"
                        <input
                            id="config-name"
                            class="form-control"
                            type="text"
                            prop:value=move || form.with(|f| f.name.clone())
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                set_form.update(|f| f.name = v);
                            }
                        />
                    </label>
                </div>
                <div class="mb-2">
                    <label class="form-label">
                        "Description"
                        <textarea
                            id="config-description"
                            class="form-control"
                            prop:value=move || form.with(|f| f.description.clone())
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                set_form.update(|f| f.description = v);
                            }
                        ></textarea>
                    </label>
                </div>
                <div class="mb-2">
                    <label class="form-label">
                        "Dilemma"
                        <select
                            id="dilemma-type"
                            class="form-select"
                            prop:value=move || form.with(|f| f.kind.label())
                            on:change=move |ev| {
                                if let Ok(kind) = event_target_value(&ev).parse::<DilemmaKind>() {
                                    set_form.update(|f| f.kind = kind);
                                }
                            }
                        >
                            {DilemmaKind::all()
                                .iter()
                                .map(|k| view! { <option value=k.label()>{k.display_name()}</option> })
                                .collect_view()}
                        </select>
                    </label>
                </div>
                <div class="mb-3">
                    <label class="form-label">
                        "Rounds"
                        <input
                            id="rounds"
                            class="form-control"
                            type="number"
                            min="1"
                            prop:value=move || form.with(|f| f.rounds.clone())
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                set_form.update(|f| f.rounds = v);
                            }
                        />
                    </label>
                </div>

                {DilemmaKind::all()
                    .iter()
                    .map(|&kind| view! { <KindPanel kind=kind form=form set_form=set_form /> })
                    .collect_view()}

                <div class="d-flex gap-2 mt-3">
                    <button class="btn btn-secondary" on:click=move |_| do_save()>
                        "Save Configuration"
                    </button>
                    <button class="btn btn-primary" on:click=move |_| do_run()>
                        "Run Simulation"
                    </button>
                </div>
            </section>

            {has_results.then(|| view! {
                <section id="results">
                    <h2>{move || frame.with(|f| {
                        f.as_ref()
                            .map(|f| format!("{} ({})", f.name, f.kind.display_name()))
                            .unwrap_or_default()
                    })}</h2>

                    <div class="d-flex gap-2 align-items-center mb-2">
                        <button
                            class="btn btn-success"
                            prop:disabled=move || !controls.get().play
                            on:click=move |_| act(WebSession::play)
                        >
                            "Play"
                        </button>
                        <button
                            class="btn btn-warning"
                            prop:disabled=move || !controls.get().pause
                            on:click=move |_| act(WebSession::toggle_pause)
                        >
                            {move || controls.get().pause_label}
                        </button>
                        <button
                            class="btn btn-info"
                            prop:disabled=move || !controls.get().step
                            on:click=move |_| act(WebSession::step)
                        >
                            "Step"
                        </button>
                        <button
                            class="btn btn-danger"
                            prop:disabled=move || !controls.get().stop
                            on:click=move |_| act(WebSession::stop)
                        >
                            "Show All"
                        </button>
                        <select
                            class="form-select w-auto"
                            prop:value=move || speed.get().to_string()
                            on:change=move |ev| {
                                if let Ok(ms) = event_target_value(&ev).parse::<u32>() {
                                    change_speed(ms);
                                }
                            }
                        >
                            {SPEED_OPTIONS
                                .iter()
                                .map(|(ms, label)| view! { <option value=ms.to_string()>{*label}</option> })
                                .collect_view()}
                        </select>
                        <span id="round-counter">{move || frame.with(|f| {
                            f.as_ref()
                                .map(|f| format!("Round {} / {}", f.progress.current, f.progress.total))
                                .unwrap_or_default()
                        })}</span>
                    </div>
                    <div class="progress mb-3">
                        <div
                            class="progress-bar"
                            style:width=move || frame.with(|f| {
                                format!("{}%", f.as_ref().map_or(0, |f| f.progress.percent))
                            })
                        ></div>
                    </div>

                    <div class="row">
                        {CHART_CANVAS_IDS
                            .iter()
                            .map(|id| view! {
                                <div class="col-md-6 mb-3">
                                    <canvas id=*id width="520" height="320"></canvas>
                                </div>
                            })
                            .collect_view()}
                    </div>

                    <Interactions frame=frame />
                    <StrategyTable frame=frame />
                    <Insights frame=frame />
                </section>
            })}

            {move || notice.get().map(|(_, n)| view! {
                <div
                    class=n.level.toast_classes()
                    role="alert"
                    style="position: fixed; bottom: 16px; right: 16px; display: block; z-index: 1080;"
                >
                    <div class="toast-header"><strong>{n.title}</strong></div>
                    <div class="toast-body">{n.message}</div>
                </div>
            })}
        </main>
    }
}

/// Strategy counts and parameters for one dilemma kind. Only the selected
/// kind's panel is shown.
#[component]
fn KindPanel(
    kind: DilemmaKind,
    form: ReadSignal<FormState>,
    set_form: WriteSignal<FormState>,
) -> impl IntoView {
    view! {
        <div
            id=kind.panel_id()
            class="dilemma-config"
            style:display=move || if form.with(|f| f.kind == kind) { "block" } else { "none" }
        >
            <h5>"Strategies"</h5>
            {kind
                .known_strategies()
                .iter()
                .map(|&strategy| view! {
                    <div class="mb-2">
                        <label class="form-label">
                            {strategy_display_name(strategy)}
                            <input
                                id=strategy_input_id(kind, strategy)
                                class="form-control strategy-count"
                                type="number"
                                min="0"
                                prop:value=move || form.with(|f| {
                                    f.panel(kind)
                                        .and_then(|p| p.strategies.get(strategy).cloned())
                                        .unwrap_or_default()
                                })
                                on:input=move |ev| {
                                    let v = event_target_value(&ev);
                                    set_form.update(|f| f.set_strategy_count(kind, strategy, v));
                                }
                            />
                        </label>
                    </div>
                })
                .collect_view()}
            <p class="total-agents">
                "Total agents: "
                <strong>{move || form.with(|f| f.total_agents(kind))}</strong>
            </p>

            <h5>"Parameters"</h5>
            {parameter_fields(kind)
                .iter()
                .map(|&field| view! { <ParameterInput kind=kind field=field form=form set_form=set_form /> })
                .collect_view()}
        </div>
    }
}

#[component]
fn ParameterInput(
    kind: DilemmaKind,
    field: &'static str,
    form: ReadSignal<FormState>,
    set_form: WriteSignal<FormState>,
) -> impl IntoView {
    let id = parameter_input_id(kind, field);
    let value = move || {
        form.with(|f| {
            f.panel(kind)
                .and_then(|p| p.parameters.get(field).cloned())
                .unwrap_or_default()
        })
    };

    let input = if field == "distribution" {
        view! {
            <select
                id=id
                class="form-select"
                prop:value=value
                on:change=move |ev| {
                    let v = event_target_value(&ev);
                    set_form.update(|f| f.set_parameter(kind, field, v));
                }
            >
                {Distribution::all()
                    .iter()
                    .map(|d| view! { <option value=d.label()>{d.label()}</option> })
                    .collect_view()}
            </select>
        }
        .into_any()
    } else {
        view! {
            <input
                id=id
                class="form-control"
                type="number"
                step=parameter_step(field)
                prop:value=value
                on:input=move |ev| {
                    let v = event_target_value(&ev);
                    set_form.update(|f| f.set_parameter(kind, field, v));
                }
            />
        }
        .into_any()
    };

    view! {
        <div class="mb-2">
            <label class="form-label">{parameter_label(field)} {input}</label>
        </div>
    }
}

#[component]
fn Interactions(frame: ReadSignal<Option<Frame>>) -> impl IntoView {
    let rows = move || frame.with(|f| f.as_ref().map(|f| f.interactions.clone()).unwrap_or_default());
    view! {
        <h4>"Latest Round"</h4>
        <table class="table table-sm" id="interactions-table">
            <thead>
                <tr>
                    <th>"Agent 1"</th>
                    <th>"Move"</th>
                    <th>"Agent 2"</th>
                    <th>"Move"</th>
                    <th>"Scores"</th>
                </tr>
            </thead>
            <tbody>
                {move || rows()
                    .into_iter()
                    .map(|row| view! {
                        <tr>
                            <td>{row.agent1}</td>
                            <td>{row.move1}</td>
                            <td>{row.agent2}</td>
                            <td>{row.move2}</td>
                            <td>{row.scores}</td>
                        </tr>
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
}

#[component]
fn StrategyTable(frame: ReadSignal<Option<Frame>>) -> impl IntoView {
    let rows = move || frame.with(|f| f.as_ref().map(|f| f.table.clone()).unwrap_or_default());
    view! {
        <h4>"Strategy Performance"</h4>
        <table class="table table-sm" id="strategy-table">
            <thead>
                <tr>
                    <th>"Strategy"</th>
                    <th>"Avg Score"</th>
                    <th>"Cooperation"</th>
                    <th>"Moves"</th>
                    <th>"Sustainability"</th>
                    <th>"Welfare"</th>
                </tr>
            </thead>
            <tbody>
                {move || rows()
                    .into_iter()
                    .map(|row| view! {
                        <tr class=row_class(row.top, row.bottom)>
                            <td>{row.name}</td>
                            <td>{row.avg_score}</td>
                            <td>{row.cooperation_rate}</td>
                            <td>{row.total_moves}</td>
                            <td class=indicator_class(row.sustainability)>
                                {row.sustainability.map_or("-", Indicator::impact_label)}
                            </td>
                            <td class=indicator_class(row.welfare)>
                                {row.welfare.map_or("-", Indicator::welfare_label)}
                            </td>
                        </tr>
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
}

#[component]
fn Insights(frame: ReadSignal<Option<Frame>>) -> impl IntoView {
    let insights = move || frame.with(|f| f.as_ref().map(|f| f.insights.clone()).unwrap_or_default());
    view! {
        <h4>"Insights"</h4>
        <div class="row" id="insights">
            {move || insights()
                .into_iter()
                .map(|i| view! {
                    <div class="col-md-6 mb-3">
                        <div class=format!("card h-100 {}", tone_class(i.tone))>
                            <div class="card-body">
                                <h5 class="card-title">{i.icon} " " {i.title}</h5>
                                <p class="card-text">{i.content}</p>
                            </div>
                        </div>
                    </div>
                })
                .collect_view()}
        </div>
    }
}
