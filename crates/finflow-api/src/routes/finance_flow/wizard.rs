//! Create bill / create invoice wizard
//!
//! The draft lives in the view state. Every step handler mutates it and
//! answers with the re-rendered `#finance-wizard` element; a successful
//! submit re-renders the whole `#finance-flow` instead.

use crate::{AppState, ApiError};
use axum::extract::Path;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use finflow_core::draft::{is_known_terms, LAST_STEP, TERMS_OPTIONS};
use finflow_core::{DocumentKind, FinanceDraft, LineItemUpdate, Party, TaxCode};
use finflow_utils::escape_html;
use std::collections::HashMap;

use super::page::Notice;
use super::refresh;
use crate::routes::{form_flag, parse_kind};

const EMPTY_WIZARD: &str = "<div id='finance-wizard'></div>";

/// Render the open draft, if any, with its party list
pub async fn current_wizard(state: &AppState) -> String {
    let draft = state.view.read().await.draft.clone();
    let Some(draft) = draft else {
        return EMPTY_WIZARD.to_string();
    };
    let parties = match state.service.parties(draft.kind).await {
        Ok(parties) => parties,
        Err(e) => {
            state.report(&e, "parties");
            Vec::new()
        }
    };
    render_wizard(state, Some(&draft), &parties)
}

pub fn render_wizard(state: &AppState, draft: Option<&FinanceDraft>, parties: &[Party]) -> String {
    let Some(draft) = draft else {
        return EMPTY_WIZARD.to_string();
    };

    let title = match draft.kind {
        DocumentKind::Payable => "Create New Bill",
        DocumentKind::Receivable => "Create New Invoice",
    };
    let body = match draft.step {
        1 => party_step(draft, parties),
        2 => items_step(state, draft),
        _ => details_step(draft),
    };

    format!(
        r#"<div id='finance-wizard' class='fixed inset-0 bg-black/30 flex items-center justify-center z-50'>
            <div class='bg-white rounded-xl shadow-xl w-full max-w-2xl p-6'>
                <div class='flex justify-between items-center mb-4'>
                    <div><h3 class='text-lg font-semibold'>{title}</h3><p class='text-sm text-gray-500'>Step {step} of {last}</p></div>
                    <button hx-post='/finance-flow/wizard/close' hx-target='#finance-wizard' hx-swap='outerHTML' class='text-gray-400 hover:text-gray-600'>✕</button>
                </div>
                {body}
                {submit_error}
                {footer}
            </div>
        </div>"#,
        title = title,
        step = draft.step,
        last = LAST_STEP,
        body = body,
        submit_error = field_error(draft, "submit"),
        footer = footer(draft),
    )
}

fn field_error(draft: &FinanceDraft, key: &str) -> String {
    draft
        .errors
        .get(key)
        .map(|message| format!("<p class='text-xs text-red-600 mt-1'>{}</p>", escape_html(message)))
        .unwrap_or_default()
}

fn party_step(draft: &FinanceDraft, parties: &[Party]) -> String {
    let label = draft.kind.party_label();
    let selected_id = draft.selected_party.as_ref().map(|p| p.id.as_str());
    let matches = draft.filtered_parties(parties);
    let list: String = if matches.is_empty() {
        format!("<p class='text-sm text-gray-500 py-4 text-center'>No {}s found</p>", label)
    } else {
        matches
            .iter()
            .map(|party| {
                let active = if Some(party.id.as_str()) == selected_id {
                    "border-indigo-500 bg-indigo-50"
                } else {
                    "hover:bg-gray-50"
                };
                format!(
                    r#"<button hx-post='/finance-flow/wizard/party' hx-vals='{{"party_id":"{id}"}}' hx-target='#finance-wizard' hx-swap='outerHTML' class='w-full text-left p-3 border rounded-lg {active}'>
                        <p class='font-medium'>{name}</p><p class='text-xs text-gray-500'>{email}</p>
                    </button>"#,
                    id = escape_html(&party.id),
                    active = active,
                    name = escape_html(&party.name),
                    email = escape_html(&party.email),
                )
            })
            .collect()
    };

    format!(
        r#"<label class='text-sm font-medium'>Select {label}</label>
        <input id='wizard-search' name='search' value='{search}' placeholder='Search {label}s by name or email...' hx-preserve='true'
            hx-post='/finance-flow/wizard/search' hx-trigger='keyup changed delay:200ms' hx-target='#finance-wizard' hx-swap='outerHTML'
            class='mt-1 mb-3 w-full px-3 py-2 border rounded-lg'>
        <div class='space-y-2 max-h-64 overflow-auto'>{list}</div>
        {error}"#,
        label = label,
        search = escape_html(&draft.search_term),
        list = list,
        error = field_error(draft, "party"),
    )
}

fn items_step(state: &AppState, draft: &FinanceDraft) -> String {
    let single = draft.items.len() == 1;
    let rows: String = draft
        .items
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let tax_options: String = TaxCode::ALL
                .iter()
                .map(|code| {
                    format!(
                        "<option value='{}' {}>{}</option>",
                        code,
                        if *code == item.tax_code { "selected" } else { "" },
                        code.label()
                    )
                })
                .collect();
            let input = |field: &str, kind: &str, value: String, width: &str| {
                format!(
                    r#"<input type='{kind}' name='value' value='{value}' hx-put='/finance-flow/wizard/items/{i}' hx-vals='{{"field":"{field}"}}' hx-trigger='change' hx-target='#finance-wizard' hx-swap='outerHTML' class='px-2 py-1 border rounded {width}'>"#,
                    kind = kind,
                    value = value,
                    i = i,
                    field = field,
                    width = width,
                )
            };
            format!(
                r#"<tr class='align-top'>
                    <td class='py-1'>{description}{description_error}</td>
                    <td>{quantity}{quantity_error}</td>
                    <td>{rate}{rate_error}</td>
                    <td><select name='value' hx-put='/finance-flow/wizard/items/{i}' hx-vals='{{"field":"tax_code"}}' hx-trigger='change' hx-target='#finance-wizard' hx-swap='outerHTML' class='px-2 py-1 border rounded bg-white'>{tax_options}</select></td>
                    <td class='text-right pt-2'>{amount}</td>
                    <td><button hx-post='/finance-flow/wizard/items/{i}/remove' hx-target='#finance-wizard' hx-swap='outerHTML' class='text-red-600 px-2' {disabled}>✕</button></td>
                </tr>"#,
                description = input("description", "text", escape_html(&item.description), "w-full"),
                description_error = field_error(draft, &format!("description_{}", i)),
                quantity = input("quantity", "number", item.quantity.to_string(), "w-20"),
                quantity_error = field_error(draft, &format!("quantity_{}", i)),
                rate = input("rate", "number", item.rate.to_string(), "w-24"),
                rate_error = field_error(draft, &format!("rate_{}", i)),
                i = i,
                tax_options = tax_options,
                amount = state.money(item.amount),
                disabled = if single { "disabled" } else { "" },
            )
        })
        .collect();

    let subtotal = draft.items.total();
    let tax = draft.items.tax_total();
    format!(
        r#"<table class='w-full text-sm mb-3'>
            <thead><tr class='text-left text-gray-500'><th>Description</th><th>Qty</th><th>Rate</th><th>Tax</th><th class='text-right'>Amount</th><th></th></tr></thead>
            <tbody>{rows}</tbody>
        </table>
        <button hx-post='/finance-flow/wizard/items' hx-target='#finance-wizard' hx-swap='outerHTML' class='text-sm text-indigo-600 hover:underline mb-4'>+ Add line item</button>
        <div class='text-sm text-right space-y-1'>
            <p>Subtotal: <span class='font-medium'>{subtotal}</span></p>
            <p>Tax: <span class='font-medium'>{tax}</span></p>
            <p class='text-base font-semibold'>Total: {total}</p>
        </div>"#,
        rows = rows,
        subtotal = state.money(subtotal),
        tax = state.money(tax),
        total = state.money(subtotal + tax),
    )
}

fn details_step(draft: &FinanceDraft) -> String {
    let date_label = match draft.kind {
        DocumentKind::Payable => "Due date",
        DocumentKind::Receivable => "Issue date",
    };
    let terms: String = TERMS_OPTIONS
        .iter()
        .map(|option| {
            format!(
                "<option value='{0}' {1}>{0}</option>",
                option,
                if *option == draft.terms { "selected" } else { "" }
            )
        })
        .collect();
    let party = draft
        .selected_party
        .as_ref()
        .map(|p| escape_html(&p.name))
        .unwrap_or_default();

    format!(
        r#"<p class='text-sm text-gray-500 mb-4'>{party_label}: <span class='font-medium text-gray-900'>{party}</span> • {count} line item(s)</p>
        <form hx-post='/finance-flow/wizard/details' hx-trigger='change' hx-target='#finance-wizard' hx-swap='outerHTML' class='grid grid-cols-2 gap-4'>
            <label class='text-sm font-medium'>{date_label}
                <input type='date' name='date' value='{date}' class='mt-1 w-full px-3 py-2 border rounded-lg'>
                {date_error}
            </label>
            <label class='text-sm font-medium'>Payment terms
                <select name='terms' class='mt-1 w-full px-3 py-2 border rounded-lg bg-white'>{terms}</select>
                {terms_error}
            </label>
        </form>"#,
        party_label = capitalize_label(draft.kind.party_label()),
        party = party,
        count = draft.items.len(),
        date_label = date_label,
        date = draft.date.map(|d| d.to_string()).unwrap_or_default(),
        date_error = field_error(draft, "date"),
        terms = terms,
        terms_error = field_error(draft, "terms"),
    )
}

fn footer(draft: &FinanceDraft) -> String {
    let back = if draft.step > 1 {
        "<button hx-post='/finance-flow/wizard/back' hx-target='#finance-wizard' hx-swap='outerHTML' class='px-4 py-2 border rounded-lg'>Back</button>"
    } else {
        ""
    };
    let forward = if draft.step < LAST_STEP {
        "<button hx-post='/finance-flow/wizard/next' hx-target='#finance-wizard' hx-swap='outerHTML' class='px-4 py-2 bg-indigo-600 text-white rounded-lg'>Next</button>".to_string()
    } else {
        let create = match draft.kind {
            DocumentKind::Payable => "Create Bill",
            DocumentKind::Receivable => "Create Invoice",
        };
        format!(
            r#"<button hx-post='/finance-flow/wizard/submit' hx-vals='{{"is_draft":"true"}}' hx-target='#finance-flow' hx-swap='outerHTML' class='px-4 py-2 border rounded-lg'>Save as Draft</button>
            <button hx-post='/finance-flow/wizard/submit' hx-vals='{{"is_draft":"false"}}' hx-target='#finance-flow' hx-swap='outerHTML' class='px-4 py-2 bg-indigo-600 text-white rounded-lg'>{}</button>"#,
            create
        )
    };
    format!(
        r#"<div class='flex justify-between mt-6 pt-4 border-t'>
            <div>{back}</div>
            <div class='space-x-2'>
                <button hx-post='/finance-flow/wizard/close' hx-target='#finance-wizard' hx-swap='outerHTML' class='px-4 py-2 text-gray-600'>Cancel</button>
                {forward}
            </div>
        </div>"#,
        back = back,
        forward = forward,
    )
}

fn capitalize_label(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Apply `edit` to the open draft, then re-render the wizard
async fn with_draft<F>(state: &AppState, edit: F) -> Html<String>
where
    F: FnOnce(&mut FinanceDraft),
{
    {
        let mut view = state.view.write().await;
        if let Some(draft) = view.draft.as_mut() {
            edit(draft);
        }
    }
    Html(current_wizard(state).await)
}

/// HTMX: Open the wizard for `kind`
pub async fn htmx_wizard_open(
    state: axum::extract::State<AppState>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let kind = match parse_kind(params.get("kind").map(String::as_str).unwrap_or("")) {
        Ok(kind) => kind,
        Err(e) => return e.into_response(),
    };
    state.view.write().await.draft = Some(FinanceDraft::new(kind, state.service.today()));
    log::debug!("Opened {} wizard", kind.document_label());
    Html(current_wizard(&state).await).into_response()
}

/// HTMX: Discard the draft
pub async fn htmx_wizard_close(state: axum::extract::State<AppState>) -> Html<String> {
    state.view.write().await.draft = None;
    Html(EMPTY_WIZARD.to_string())
}

pub async fn htmx_wizard_search(
    state: axum::extract::State<AppState>,
    Form(params): Form<HashMap<String, String>>,
) -> Html<String> {
    let term = params.get("search").cloned().unwrap_or_default();
    with_draft(&state, |draft| draft.search_term = term).await
}

pub async fn htmx_wizard_party(
    state: axum::extract::State<AppState>,
    Form(params): Form<HashMap<String, String>>,
) -> Html<String> {
    let kind = state.view.read().await.draft.as_ref().map(|d| d.kind);
    let Some(kind) = kind else {
        return Html(EMPTY_WIZARD.to_string());
    };
    let party_id = params.get("party_id").cloned().unwrap_or_default();
    let party = match state.service.parties(kind).await {
        Ok(parties) => parties.into_iter().find(|p| p.id == party_id),
        Err(e) => {
            state.report(&e, "parties");
            None
        }
    };
    with_draft(&state, |draft| match party {
        Some(party) => draft.select_party(party),
        None => {
            draft.errors.insert(
                "party".to_string(),
                format!("Please select a {}", draft.kind.party_label()),
            );
        }
    })
    .await
}

pub async fn htmx_wizard_next(state: axum::extract::State<AppState>) -> Html<String> {
    with_draft(&state, |draft| {
        draft.next();
    })
    .await
}

pub async fn htmx_wizard_back(state: axum::extract::State<AppState>) -> Html<String> {
    with_draft(&state, FinanceDraft::back).await
}

pub async fn htmx_wizard_add_item(state: axum::extract::State<AppState>) -> Html<String> {
    with_draft(&state, |draft| draft.items.add_item()).await
}

/// HTMX: Edit one field of line `index`; unparsable numbers count as 0
pub async fn htmx_wizard_update_item(
    state: axum::extract::State<AppState>,
    Path(index): Path<usize>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let value = params.get("value").cloned().unwrap_or_default();
    let number = || value.trim().parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0);
    let update = match params.get("field").map(String::as_str) {
        Some("description") => LineItemUpdate::Description(value.clone()),
        Some("quantity") => LineItemUpdate::Quantity(number()),
        Some("rate") => LineItemUpdate::Rate(number()),
        Some("tax_code") => match value.parse::<TaxCode>() {
            Ok(code) => LineItemUpdate::TaxCode(code),
            Err(e) => return ApiError::bad_request(e).into_response(),
        },
        _ => return ApiError::bad_request("Unknown line item field").into_response(),
    };
    with_draft(&state, |draft| draft.items.update_item(index, update))
        .await
        .into_response()
}

pub async fn htmx_wizard_remove_item(
    state: axum::extract::State<AppState>,
    Path(index): Path<usize>,
) -> Html<String> {
    with_draft(&state, |draft| draft.items.remove_item(index)).await
}

/// HTMX: Step 3 fields; a blank or invalid date clears it
pub async fn htmx_wizard_details(
    state: axum::extract::State<AppState>,
    Form(params): Form<HashMap<String, String>>,
) -> Html<String> {
    let date = params
        .get("date")
        .and_then(|d| chrono::NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok());
    let terms = params.get("terms").map(|t| t.trim().to_string());
    with_draft(&state, |draft| {
        draft.date = date;
        draft.errors.remove("date");
        draft.errors.remove("terms");
        match terms {
            Some(terms) if is_known_terms(&terms) => draft.terms = terms,
            Some(_) => {
                draft.errors.insert("terms".to_string(), "Choose one of the listed payment terms".to_string());
            }
            None => {}
        }
    })
    .await
}

/// HTMX: Create the document (or save it as a draft)
///
/// Success closes the wizard and re-renders the finance flow. Validation or
/// service failures keep the wizard open with its errors.
pub async fn htmx_wizard_submit(
    state: axum::extract::State<AppState>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let is_draft = form_flag(&params, "is_draft");
    let submitted = {
        let mut view = state.view.write().await;
        view.draft.as_mut().map(|draft| {
            let at_last_step = draft.step == LAST_STEP;
            (draft.kind, at_last_step, draft.submit(is_draft))
        })
    };
    let Some((kind, at_last_step, submitted)) = submitted else {
        return refresh(&state, None).await.into_response();
    };

    let failure = match submitted {
        Ok(doc) => match state.service.create_document(doc).await {
            Ok(_) => {
                state.view.write().await.draft = None;
                let message = match (is_draft, kind) {
                    (true, _) => "Draft saved",
                    (false, DocumentKind::Payable) => "Bill created",
                    (false, DocumentKind::Receivable) => "Invoice created",
                };
                return refresh(&state, Some(Notice::Success(message.to_string())))
                    .await
                    .into_response();
            }
            Err(e) => {
                state.report(&e, "create_document");
                if e.is_client_error() {
                    e.to_string()
                } else {
                    format!("Failed to create {}. Please try again.", kind.document_label())
                }
            }
        },
        Err(e) if !at_last_step => e.to_string(),
        // field errors are already on the draft
        Err(_) => String::new(),
    };

    if !failure.is_empty() {
        let mut view = state.view.write().await;
        if let Some(draft) = view.draft.as_mut() {
            draft.errors.insert("submit".to_string(), failure);
        }
    }
    let wizard = current_wizard(&state).await;
    (
        [("HX-Retarget", "#finance-wizard"), ("HX-Reswap", "outerHTML")],
        Html(wizard),
    )
        .into_response()
}
