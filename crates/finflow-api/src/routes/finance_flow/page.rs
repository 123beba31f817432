//! Finance flow page rendering
//!
//! The whole split view lives in `#finance-flow`; every table action swaps
//! that element, while the create wizard swaps only `#finance-wizard`.

use crate::{error_fragment, page_response, success_fragment, AppState, PanelState, ViewState};
use finflow_core::aging::filter_by_bucket;
use finflow_core::{
    AgingBucket, DocumentKind, FinanceBasis, FinanceFlowData, FinanceInsights, FinanceRecord,
    FinanceStatus,
};
use finflow_utils::escape_html;

use super::wizard::current_wizard;
use super::{kind_segment, visible_ids};

pub async fn page_finance_flow(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let inner_content = match state.service.get_finance_flow().await {
        Ok(data) => {
            let wizard = current_wizard(&state).await;
            let view = state.view.read().await;
            render_finance_flow(&state, &data, &view, None, &wizard)
        }
        Err(e) => {
            state.report(&e, "finance_flow");
            format!(
                "<div class='mb-6'><h2 class='text-2xl font-bold'>Finance Flow</h2></div>{}",
                error_fragment("Error loading finance data")
            )
        }
    };

    axum::response::Html(page_response(&headers, "Finance Flow", "/finance-flow", &inner_content))
}

/// A transient message shown above the tables
pub enum Notice {
    Success(String),
    Error(String),
}

/// The complete `#finance-flow` element
pub fn render_finance_flow(
    state: &AppState,
    data: &FinanceFlowData,
    view: &ViewState,
    notice: Option<Notice>,
    wizard: &str,
) -> String {
    let today = state.service.today();
    let convention = state.config.finance.aging_convention;
    let payables = filter_by_bucket(&data.payables, view.payables.bucket, today, convention);
    let receivables = filter_by_bucket(&data.receivables, view.receivables.bucket, today, convention);

    let notice_html = match notice {
        Some(Notice::Success(message)) => success_fragment(&message),
        Some(Notice::Error(message)) => error_fragment(&message),
        None => String::new(),
    };
    let left = view.splitter.position;

    format!(
        r#"<div id='finance-flow'>
        <div class='flex justify-between items-center mb-6'>
            <div><h2 class='text-2xl font-bold'>Finance Flow</h2><p class='text-gray-500'>Manage bills you owe and invoices you are owed</p></div>
            <div class='flex items-center gap-2'>{basis}</div>
        </div>
        <div class='grid grid-cols-2 gap-4 mb-4'>
            <div class='bg-white p-4 rounded-lg border'><p class='text-sm text-gray-500'>Total Payables</p><p class='text-2xl font-bold text-red-600'>{total_payables}</p></div>
            <div class='bg-white p-4 rounded-lg border'><p class='text-sm text-gray-500'>Total Receivables</p><p class='text-2xl font-bold text-green-600'>{total_receivables}</p></div>
        </div>
        <div id='finance-notice' class='mb-4'>{notice}</div>
        <div class='flex gap-4'>
            <div class='flex-1 min-w-0'>
                <div id='finance-split' class='flex items-stretch' data-min='{min}' data-max='{max}'>
                    <section id='payables-panel' class='min-w-0 pr-2' style='width: {left}%'>{payables}</section>
                    <div id='finance-splitter' class='w-1 cursor-col-resize bg-gray-200 hover:bg-indigo-400 rounded' title='Drag to resize'></div>
                    <section id='receivables-panel' class='min-w-0 pl-2' style='width: {right}%'>{receivables}</section>
                </div>
            </div>
            <aside class='w-72 flex-shrink-0'>{insights}</aside>
        </div>
        {wizard}
        {script}
    </div>"#,
        basis = basis_toggle(view.basis),
        total_payables = state.money(data.total_payables),
        total_receivables = state.money(data.total_receivables),
        notice = notice_html,
        min = view.splitter.min,
        max = view.splitter.max,
        left = left,
        right = 100.0 - left,
        payables = panel(state, DocumentKind::Payable, &data.payable_aging, &view.payables, &payables),
        receivables = panel(state, DocumentKind::Receivable, &data.receivable_aging, &view.receivables, &receivables),
        insights = insights_sidebar(state, &data.insights),
        wizard = wizard,
        script = SPLITTER_SCRIPT,
    )
}

fn basis_toggle(current: FinanceBasis) -> String {
    [(FinanceBasis::Accrual, "Accrual"), (FinanceBasis::Cash, "Cash")]
        .iter()
        .map(|(basis, label)| {
            let class = if *basis == current { "bg-indigo-600 text-white" } else { "bg-white text-gray-700 hover:bg-gray-50" };
            format!(
                r#"<button hx-post='/finance-flow/basis' hx-vals='{{"basis":"{}"}}' hx-target='#finance-flow' hx-swap='outerHTML' class='px-3 py-1.5 text-sm border rounded-lg {}'>{}</button>"#,
                basis, class, label
            )
        })
        .collect()
}

/// Aging buckets, bulk bar and table for one side
fn panel<T: FinanceRecord>(
    state: &AppState,
    kind: DocumentKind,
    aging: &[AgingBucket],
    panel_state: &PanelState,
    rows: &[&T],
) -> String {
    let segment = kind_segment(kind);
    let (title, new_label) = match kind {
        DocumentKind::Payable => ("Payables", "New Bill"),
        DocumentKind::Receivable => ("Receivables", "New Invoice"),
    };

    let buckets: String = aging
        .iter()
        .map(|bucket| {
            let active = panel_state.bucket == Some(bucket.range);
            let class = if active { "border-indigo-500 bg-indigo-50" } else { "border-gray-200 bg-white hover:bg-gray-50" };
            format!(
                r#"<button hx-post='/finance-flow/{segment}/bucket' hx-vals='{{"range":"{range}"}}' hx-target='#finance-flow' hx-swap='outerHTML' class='p-2 border rounded-lg text-left {class}' aria-pressed='{active}'>
                    <p class='text-xs text-gray-500'>{label}</p>
                    <p class='font-semibold'>{amount}</p>
                    <p class='text-xs text-gray-400'>{count} items · {pct}%</p>
                </button>"#,
                segment = segment,
                range = bucket.range,
                class = class,
                active = active,
                label = escape_html(&bucket.label),
                amount = state.money(bucket.amount),
                count = bucket.count,
                pct = bucket.percentage,
            )
        })
        .collect();

    let ids = visible_ids(rows);
    let all_selected = !ids.is_empty() && panel_state.selection.all_selected(&ids);
    let selected = panel_state.selection.len();

    let bulk_bar = if selected > 0 {
        format!(
            r#"<div class='flex items-center gap-2 p-3 bg-gray-100 rounded-lg mb-2'>
                <span class='text-sm font-medium'>{count} item{plural} selected</span>
                <button hx-post='/finance-flow/{segment}/bulk' hx-vals='{{"action":"markPaid"}}' hx-target='#finance-flow' hx-swap='outerHTML' class='px-3 py-1 text-sm border rounded bg-white'>Mark as Paid</button>
                <button hx-post='/finance-flow/{segment}/bulk' hx-vals='{{"action":"export"}}' hx-target='#finance-flow' hx-swap='outerHTML' class='px-3 py-1 text-sm border rounded bg-white'>Export CSV</button>
            </div>"#,
            count = selected,
            plural = if selected > 1 { "s" } else { "" },
            segment = segment,
        )
    } else {
        String::new()
    };

    let body: String = if rows.is_empty() {
        "<tr><td colspan='6' class='py-6 text-center text-gray-500'>No items in this range</td></tr>".to_string()
    } else {
        rows.iter()
            .map(|row| table_row(state, segment, *row, panel_state.selection.is_selected(row.id())))
            .collect()
    };

    let filter_note = match panel_state.bucket {
        Some(range) => format!(
            "<span class='text-xs text-indigo-600'>Filtered: {} days</span>",
            range
        ),
        None => String::new(),
    };

    format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-4'>
            <div class='flex justify-between items-center mb-3'>
                <h3 class='text-lg font-semibold'>{title} {filter_note}</h3>
                <button hx-post='/finance-flow/wizard/open' hx-vals='{{"kind":"{segment}"}}' hx-target='#finance-wizard' hx-swap='outerHTML' class='px-3 py-1.5 text-sm bg-indigo-600 text-white rounded-lg'>+ {new_label}</button>
            </div>
            <div class='grid grid-cols-4 gap-2 mb-3'>{buckets}</div>
            {bulk_bar}
            <table class='w-full text-sm'>
                <thead><tr class='border-b text-left text-gray-500'>
                    <th class='py-2 w-8'><input type='checkbox' aria-label='Select all' {all_checked} hx-post='/finance-flow/{segment}/select-all' hx-vals='{{"checked":"{toggle_all}"}}' hx-target='#finance-flow' hx-swap='outerHTML'></th>
                    <th>Invoice #</th><th>{party}</th><th>{date_label}</th><th class='text-right'>Amount</th><th>Status</th>
                </tr></thead>
                <tbody>{body}</tbody>
            </table>
        </div>"#,
        title = title,
        filter_note = filter_note,
        segment = segment,
        new_label = new_label,
        buckets = buckets,
        bulk_bar = bulk_bar,
        all_checked = if all_selected { "checked" } else { "" },
        toggle_all = !all_selected,
        party = capitalize(kind.party_label()),
        date_label = match kind {
            DocumentKind::Payable => "Due Date",
            DocumentKind::Receivable => "Issue Date",
        },
        body = body,
    )
}

fn table_row<T: FinanceRecord>(state: &AppState, segment: &str, row: &T, selected: bool) -> String {
    format!(
        r#"<tr class='border-b hover:bg-gray-50'>
            <td class='py-2'><input type='checkbox' aria-label='Select {number}' {checked} hx-post='/finance-flow/{segment}/select' hx-vals='{{"id":"{id}","checked":"{toggle}"}}' hx-target='#finance-flow' hx-swap='outerHTML'></td>
            <td class='font-medium'>{number}</td>
            <td>{party}</td>
            <td>{date}</td>
            <td class='text-right font-semibold'>{amount}</td>
            <td>{status}</td>
        </tr>"#,
        number = escape_html(row.invoice_number()),
        checked = if selected { "checked" } else { "" },
        segment = segment,
        id = escape_html(row.id()),
        toggle = !selected,
        party = escape_html(&row.party().name),
        date = row.display_date().format("%b %-d, %Y"),
        amount = state.money(row.amount()),
        status = status_badge(row.status()),
    )
}

pub fn status_badge(status: FinanceStatus) -> String {
    let (class, label) = match status {
        FinanceStatus::Paid => ("bg-green-100 text-green-700", "Paid"),
        FinanceStatus::Unpaid => ("bg-gray-100 text-gray-700", "Unpaid"),
        FinanceStatus::Overdue => ("bg-red-100 text-red-700", "Overdue"),
    };
    format!("<span class='px-2 py-0.5 rounded text-xs {}'>{}</span>", class, label)
}

fn insights_sidebar(state: &AppState, insights: &FinanceInsights) -> String {
    let overdue: String = insights
        .top_overdue_vendors
        .iter()
        .map(|v| {
            format!(
                "<li class='flex justify-between text-sm'><span>{}</span><span class='text-red-600'>{} · {}d</span></li>",
                escape_html(&v.vendor.name),
                state.money(v.amount),
                v.days_past_due
            )
        })
        .collect();
    let customers: String = insights
        .top_customers
        .iter()
        .map(|c| {
            format!(
                "<li class='flex justify-between text-sm'><span>{}</span><span class='text-green-600'>{}</span></li>",
                escape_html(&c.customer.name),
                state.money(c.amount)
            )
        })
        .collect();

    format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-4 space-y-4'>
            <h3 class='text-lg font-semibold'>Insights</h3>
            <div class='grid grid-cols-2 gap-2'>
                <div class='p-2 bg-gray-50 rounded'><p class='text-xs text-gray-500'>Avg. Payment Time</p><p class='font-semibold'>{} days</p></div>
                <div class='p-2 bg-gray-50 rounded'><p class='text-xs text-gray-500'>DSO</p><p class='font-semibold'>{} days</p></div>
            </div>
            <div><p class='text-sm font-medium mb-1'>Top Overdue Vendors</p><ul class='space-y-1'>{}</ul></div>
            <div><p class='text-sm font-medium mb-1'>Top Customers</p><ul class='space-y-1'>{}</ul></div>
        </div>"#,
        insights.avg_payment_time, insights.dso, overdue, customers
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Posts the dragged percentage on mouseup; the server snaps and clamps it
const SPLITTER_SCRIPT: &str = r#"<script>
(function () {
    const handle = document.getElementById('finance-splitter');
    const split = document.getElementById('finance-split');
    if (!handle || !split) return;
    handle.addEventListener('mousedown', function (down) {
        down.preventDefault();
        const left = document.getElementById('payables-panel');
        const right = document.getElementById('receivables-panel');
        const min = parseFloat(split.dataset.min), max = parseFloat(split.dataset.max);
        let pct = null;
        function move(e) {
            const rect = split.getBoundingClientRect();
            pct = Math.min(max, Math.max(min, (e.clientX - rect.left) / rect.width * 100));
            left.style.width = pct + '%';
            right.style.width = (100 - pct) + '%';
        }
        function up() {
            document.removeEventListener('mousemove', move);
            document.removeEventListener('mouseup', up);
            if (pct !== null) {
                htmx.ajax('POST', '/finance-flow/splitter', { values: { position: pct }, target: '#finance-flow', swap: 'outerHTML' });
            }
        }
        document.addEventListener('mousemove', move);
        document.addEventListener('mouseup', up);
    });
})();
</script>"#;
