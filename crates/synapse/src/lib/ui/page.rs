use serde::{Deserialize, Serialize};

use crate::{
    catalog::ModelCatalog,
    error::Error,
    types::InputKind,
    ui::{
        markdown::render_markdown, FlowState, FormFields, Phase, DEFAULT_OUTPUT_LANGUAGE,
        DEFAULT_TRANSLATE_LANGUAGE, OUTPUT_LANGUAGES,
    },
};

const INDEX_TEMPLATE: &str = include_str!("./templates/index.mustache");

/// Fields posted by either form on the page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageForm {
    pub input_kind: String,
    pub input_value: String,
    pub language: String,
    pub model: String,
    pub target_language: String,
    pub summary: String,
    pub translation: String,
}

impl PageForm {
    /// Settled flow state described by the posted fields.
    pub fn into_state(self, catalog: &ModelCatalog) -> FlowState {
        let or_default = |value: String, default: &str| {
            if value.trim().is_empty() {
                default.to_string()
            } else {
                value
            }
        };

        let form = FormFields {
            input_kind: InputKind::from_form_value(&self.input_kind),
            input_value: self.input_value,
            language: or_default(self.language, DEFAULT_OUTPUT_LANGUAGE),
            model: or_default(self.model, catalog.default_model().identifier),
            target_language: or_default(self.target_language, DEFAULT_TRANSLATE_LANGUAGE),
        };

        FlowState::restore(form, Some(self.summary), Some(self.translation))
    }
}

#[derive(Serialize)]
struct SelectOption<'a> {
    value: &'a str,
    label: &'a str,
    selected: bool,
}

#[derive(Serialize)]
struct PageContext<'a> {
    phase: Phase,
    kinds: Vec<SelectOption<'a>>,
    input_kind: &'a str,
    input_value: &'a str,
    placeholder: &'a str,
    models: Vec<SelectOption<'a>>,
    model: &'a str,
    model_label: &'a str,
    languages: Vec<SelectOption<'a>>,
    language: &'a str,
    target_languages: Vec<SelectOption<'a>>,
    target_language: &'a str,
    has_summary: bool,
    summary: &'a str,
    summary_html: String,
    has_translation: bool,
    translation: &'a str,
    translation_html: String,
    can_translate: bool,
    has_error: bool,
    error: &'a str,
    has_error_details: bool,
    error_details: &'a str,
}

fn language_options<'a>(selected: &'a str) -> Vec<SelectOption<'a>> {
    let mut options = OUTPUT_LANGUAGES
        .iter()
        .map(|l| SelectOption {
            value: l,
            label: l,
            selected: *l == selected,
        })
        .collect::<Vec<_>>();

    // keep a posted language that is not in the fixed list selectable
    if !options.iter().any(|o| o.selected) {
        options.push(SelectOption {
            value: selected,
            label: selected,
            selected: true,
        });
    }
    options
}

/// Renders the single page for `state`.
///
/// `error_details` is shown under the error message when present.
pub fn render_page(
    state: &FlowState,
    catalog: &ModelCatalog,
    error_details: Option<&str>,
) -> Result<String, Error> {
    let form = &state.form;

    let context = PageContext {
        phase: state.phase,
        kinds: InputKind::ALL
            .iter()
            .map(|k| SelectOption {
                value: k.as_str(),
                label: k.label(),
                selected: *k == form.input_kind,
            })
            .collect(),
        input_kind: form.input_kind.as_str(),
        input_value: &form.input_value,
        placeholder: form.input_kind.placeholder(),
        models: catalog
            .models()
            .iter()
            .map(|m| SelectOption {
                value: m.identifier,
                label: m.display_label,
                selected: m.identifier == form.model,
            })
            .collect(),
        model: &form.model,
        model_label: catalog.label_for(&form.model),
        languages: language_options(&form.language),
        language: &form.language,
        target_languages: language_options(&form.target_language),
        target_language: &form.target_language,
        has_summary: state.summary.is_some(),
        summary: state.summary.as_deref().unwrap_or_default(),
        summary_html: state.summary.as_deref().map(render_markdown).unwrap_or_default(),
        has_translation: state.translation.is_some(),
        translation: state.translation.as_deref().unwrap_or_default(),
        translation_html: state
            .translation
            .as_deref()
            .map(render_markdown)
            .unwrap_or_default(),
        can_translate: state.can_translate(),
        has_error: state.error.is_some(),
        error: state.error.as_deref().unwrap_or_default(),
        has_error_details: error_details.is_some(),
        error_details: error_details.unwrap_or_default(),
    };

    let page = mustache::compile_str(INDEX_TEMPLATE)?.render_to_string(&context)?;
    Ok(page)
}
