//! Main module for the Lucky Wheel application using Yew.
//! Wires the entry form, the entry table and the wheel modal to one spin controller.

use log::warn;
use lucky_wheel::config::{BALANCE_TOLERANCE_PCT, MAX_ENTRIES};
use lucky_wheel::{RngSource, SpinController, SpinPhase, TimerScheduler};
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

mod components;
mod hooks;
mod utils;

use components::{render_entry_table, WheelModal};
use utils::{confirm, format_total};

type Controller = SpinController<TimerScheduler>;

/// Root component. Owns the controller; timer callbacks re-render through its observer.
#[function_component(App)]
fn app() -> Html {
    let force_update = use_force_update();
    let controller = {
        let force_update = force_update.clone();
        use_mut_ref(move || {
            let mut controller =
                Controller::new(TimerScheduler::default(), RngSource::from_thread());
            controller.set_observer(Rc::new(move || force_update.force_update()));
            controller
        })
    };

    let label_text = use_state(String::new);
    let error_message = use_state(|| None::<String>);

    let label_oninput = {
        let label_setter = label_text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            label_setter.set(input.value());
        })
    };

    let on_add = {
        let controller = controller.clone();
        let label_text = label_text.clone();
        let error_message = error_message.clone();
        let force_update = force_update.clone();
        Callback::from(move |_: ()| {
            let result = controller.borrow().store_mut().add(&label_text);
            match result {
                Ok(()) => {
                    label_text.set(String::new());
                    error_message.set(None);
                }
                Err(err) => error_message.set(Some(err.to_string())),
            }
            force_update.force_update();
        })
    };

    let label_onkeydown = {
        let add_handler = on_add.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                add_handler.emit(());
            }
        })
    };

    let on_equal = {
        let controller = controller.clone();
        let force_update = force_update.clone();
        Callback::from(move |_: MouseEvent| {
            controller.borrow().store_mut().redistribute_equal();
            force_update.force_update();
        })
    };

    let on_delete = {
        let controller = controller.clone();
        let error_message = error_message.clone();
        let force_update = force_update.clone();
        Callback::from(move |index: usize| {
            if !confirm("Delete this entry?") {
                return;
            }
            let result = controller.borrow().store_mut().remove(index);
            if let Err(err) = result {
                error_message.set(Some(err.to_string()));
            }
            force_update.force_update();
        })
    };

    let on_weight = {
        let controller = controller.clone();
        let force_update = force_update.clone();
        Callback::from(move |(index, raw): (usize, String)| {
            // invalid input keeps the stored weight; the row re-renders it
            controller.borrow().store_mut().set_weight(index, &raw);
            force_update.force_update();
        })
    };

    let on_spin = {
        let controller = controller.clone();
        let error_message = error_message.clone();
        let force_update = force_update.clone();
        Callback::from(move |_: MouseEvent| {
            let result = controller.borrow_mut().request_spin();
            match result {
                Ok(_) => error_message.set(None),
                Err(err) => {
                    warn!("Spin refused: {}", err);
                    error_message.set(Some(err.to_string()));
                }
            }
            force_update.force_update();
        })
    };

    let on_stop = {
        let controller = controller.clone();
        let force_update = force_update.clone();
        Callback::from(move |_: ()| {
            let result = controller.borrow_mut().request_stop();
            if let Err(err) = result {
                warn!("Stop failed: {}", err);
            }
            force_update.force_update();
        })
    };

    let on_close = {
        let controller = controller.clone();
        let force_update = force_update.clone();
        Callback::from(move |_: ()| {
            controller.borrow_mut().close();
            force_update.force_update();
        })
    };

    // Snapshot for this render; no borrow outlives it
    let (entries, total, balanced, phase, rotation, layout, winner) = {
        let controller = controller.borrow();
        let store = controller.store();
        let snapshot = (
            store.entries().to_vec(),
            store.total_weight(),
            store.is_balanced(BALANCE_TOLERANCE_PCT),
            controller.phase(),
            controller.rotation(),
            controller.layout(),
            controller.winner(),
        );
        snapshot
    };

    html! {
        <div class="container">
            <h1>{ "Lucky Wheel" }</h1>

            <div class="input-row">
                <input type="text"
                    id="label_input"
                    placeholder="Enter an option"
                    aria-label="New option"
                    value={(*label_text).clone()}
                    oninput={label_oninput}
                    onkeydown={label_onkeydown}
                />
                <button class="btn-primary"
                    disabled={entries.len() >= MAX_ENTRIES}
                    onclick={on_add.reform(|_: MouseEvent| ())}
                >
                    { "Add" }
                </button>
                <button class="btn-secondary" onclick={on_equal}>{ "Equal" }</button>
            </div>

            if let Some(ref err) = *error_message {
                <div class="current-error">{ err.clone() }</div>
            }

            { render_entry_table(&entries, on_delete, on_weight) }

            <div class={classes!("total-status", if balanced { "balanced" } else { "unbalanced" })}>
                { format_total(total, entries.len()) }
            </div>

            <button class="btn-primary spin-button" onclick={on_spin}>{ "Spin" }</button>

            if phase != SpinPhase::Idle {
                <WheelModal
                    {layout}
                    {rotation}
                    {phase}
                    winner={winner.map(|entry| entry.label)}
                    {on_stop}
                    {on_close}
                />
            }
        </div>
    }
}

/// Entry point: installs the panic hook and renders the App component.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
