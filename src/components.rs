//! Yew view components for the Lucky Wheel UI.
//!
//! Everything here renders from props; state lives in the spin controller owned by
//! the root component.

use crate::hooks::use_weight_input;
use lucky_wheel::config::WHEEL_RADIUS;
use lucky_wheel::svg::{rotation_style, wheel_shapes};
use lucky_wheel::{Entry, SpinPhase, WheelLayout};
use yew::prelude::*;

/// Renders the entry table, or a placeholder row when there are no entries.
pub fn render_entry_table(
    entries: &[Entry],
    on_delete: Callback<usize>,
    on_weight: Callback<(usize, String)>,
) -> Html {
    html! {
        <table class="menu-table">
            <thead>
                <tr>
                    <th>{ "Option" }</th>
                    <th>{ "Weight (%)" }</th>
                </tr>
            </thead>
            <tbody>
                if entries.is_empty() {
                    <tr class="empty-row">
                        <td colspan="2">{ "No entries yet" }</td>
                    </tr>
                } else {
                    { entries.iter().enumerate().map(|(index, entry)| html! {
                        <EntryRow
                            key={index}
                            {index}
                            entry={entry.clone()}
                            on_delete={on_delete.clone()}
                            on_weight={on_weight.clone()}
                        />
                    }).collect::<Html>() }
                }
            </tbody>
        </table>
    }
}

/// One table row: label, delete button and weight field.
#[derive(Properties, PartialEq)]
pub struct EntryRowProps {
    pub index: usize,
    pub entry: Entry,
    pub on_delete: Callback<usize>,
    pub on_weight: Callback<(usize, String)>,
}

#[function_component(EntryRow)]
pub fn entry_row(props: &EntryRowProps) -> Html {
    let index = props.index;
    let weight = use_weight_input(
        props.entry.weight,
        props.on_weight.reform(move |raw: String| (index, raw)),
    );

    let onkeydown = {
        let commit = weight.on_commit.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                commit.emit(());
            }
        })
    };

    html! {
        <tr>
            <td>
                <div class="menu-wrapper">
                    <span class="menu-text">{ props.entry.label.clone() }</span>
                    <button class="delete-button"
                        aria-label="Delete"
                        title="Delete"
                        onclick={props.on_delete.reform(move |_: MouseEvent| index)}
                    >
                        { "🗑️" }
                    </button>
                </div>
            </td>
            <td>
                <input type="number"
                    class="probability-input"
                    min="0"
                    step="0.1"
                    aria-label={format!("Weight of {}", props.entry.label)}
                    value={weight.text.clone()}
                    oninput={weight.on_text_input.clone()}
                    onchange={weight.on_commit.reform(|_: Event| ())}
                    onblur={weight.on_blur.clone()}
                    {onkeydown}
                />
            </td>
        </tr>
    }
}

/// Modal with the wheel, pointer, result line and Stop/Close buttons.
#[derive(Properties, PartialEq)]
pub struct WheelModalProps {
    pub layout: Option<WheelLayout>,
    pub rotation: f64,
    pub phase: SpinPhase,
    pub winner: Option<String>,
    pub on_stop: Callback<()>,
    pub on_close: Callback<()>,
}

#[function_component(WheelModal)]
pub fn wheel_modal(props: &WheelModalProps) -> Html {
    let shapes = props
        .layout
        .as_ref()
        .map(|layout| wheel_shapes(layout, WHEEL_RADIUS))
        .unwrap_or_default();
    // CSS eases the jump to the final rotation; free spinning is driven per frame
    let easing = matches!(props.phase, SpinPhase::Resolving | SpinPhase::Settled);
    let size = (WHEEL_RADIUS * 2.0).to_string();

    html! {
        <div class="modal-overlay show" onclick={props.on_close.reform(|_: MouseEvent| ())}>
            <div class="modal" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                <div class="wheel-container">
                    <div class="spinning-wheel" style={rotation_style(props.rotation, easing)}>
                        <svg width={size.clone()}
                            height={size.clone()}
                            viewBox={format!("0 0 {} {}", size, size)}
                            style="width: 100%; height: 100%;"
                        >
                            { for shapes.iter().map(|shape| html! {
                                <path d={shape.path.clone()}
                                    fill={shape.fill}
                                    data-index={shape.index.to_string()}
                                />
                            }) }
                            { for shapes.iter().map(|shape| html! {
                                <text x={shape.label_x.to_string()}
                                    y={shape.label_y.to_string()}
                                    fill="white"
                                    font-size="16"
                                    font-weight="bold"
                                    text-anchor="middle"
                                    dominant-baseline="middle"
                                >
                                    { shape.label.clone() }
                                </text>
                            }) }
                        </svg>
                    </div>
                    // fixed at 3 o'clock, where the wheel maths puts the pointer
                    <div class="wheel-pointer" aria-hidden="true"></div>
                </div>
                <div class="result-text">
                    if let Some(ref winner) = props.winner {
                        { format!("Result: {}", winner) }
                    }
                </div>
                <div class="modal-buttons">
                    <button class="btn-primary"
                        disabled={props.phase != SpinPhase::Spinning}
                        onclick={props.on_stop.reform(|_: MouseEvent| ())}
                    >
                        { "Stop" }
                    </button>
                    <button class="btn-secondary" onclick={props.on_close.reform(|_: MouseEvent| ())}>
                        { "Close" }
                    </button>
                </div>
            </div>
        </div>
    }
}
