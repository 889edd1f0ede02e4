use crate::utils::format_weight;
use lucky_wheel::store::parse_weight;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Holds the text and callbacks for one weight field.
#[derive(Clone)]
pub struct WeightInput {
    /// What the field currently shows; may be an uncommitted edit.
    pub text: String,
    /// Callback for the field's `oninput` event. Only updates the text.
    pub on_text_input: Callback<InputEvent>,
    /// Hands the current text to the store. Unparsable text snaps back to the stored value.
    pub on_commit: Callback<()>,
    /// Restores the stored value if the field is left empty or unparsable.
    pub on_blur: Callback<FocusEvent>,
}

/// Custom hook tying a number field to a stored weight.
///
/// The store decides whether a commit is accepted; this hook only keeps the text in
/// step with whatever the store ends up holding.
#[hook]
pub fn use_weight_input(stored: f64, commit: Callback<String>) -> WeightInput {
    let text_handle = use_state(|| format_weight(stored));

    let on_text_input = {
        let text_setter = text_handle.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text_setter.set(input.value());
        })
    };

    let on_commit = {
        let text_handle = text_handle.clone();
        Callback::from(move |_| {
            let raw = (*text_handle).clone();
            if parse_weight(&raw).is_err() {
                text_handle.set(format_weight(stored));
            }
            commit.emit(raw);
        })
    };

    let on_blur = {
        let text_handle = text_handle.clone();
        Callback::from(move |_: FocusEvent| {
            if parse_weight(&text_handle).is_err() {
                text_handle.set(format_weight(stored));
            }
        })
    };

    // Stored value changed (commit, redistribution, removal): show it
    {
        let text_setter = text_handle.clone();
        use_effect_with(stored, move |&current| {
            text_setter.set(format_weight(current));
            || ()
        });
    }

    WeightInput {
        text: (*text_handle).clone(),
        on_text_input,
        on_commit,
        on_blur,
    }
}
