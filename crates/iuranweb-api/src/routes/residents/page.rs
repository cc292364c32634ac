//! Resident page rendering - Full page endpoints
//!
//! Endpoints:
//! - page_residents: Summary cards, search box, resident table, info section
//!
//! Helper functions:
//! - render_residents_content: Table (or empty state) for a filtered list
//! - render_count: "Menampilkan X dari Y warga" badge

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use axum::Extension;
use iuranweb_config::{BillingConfig, DuesComponent};
use iuranweb_core::{DirectorySummary, Resident};
use iuranweb_utils::{escape_html, format_compact, format_currency, initials, padded_id};

use crate::routes::selection::render_qris_modal;
use crate::{AppState, SessionId};

/// Resident list page - restores the session's query and open modal
pub async fn page_residents(
    State(state): State<AppState>,
    Extension(SessionId(sid)): Extension<SessionId>,
    headers: HeaderMap,
) -> Html<String> {
    let formatter = &state.formatter;
    let (query, open) = state
        .sessions
        .with_session(&sid, |s| {
            let open = s
                .selection
                .active()
                .map(|a| (a.resident.clone(), formatter.format(&a.resident, a.opened_at)));
            (s.query().to_string(), open)
        })
        .await;

    let billing = &state.config.billing;
    let symbol = &billing.currency_symbol;
    let residents = state.directory.filter(&query);
    let modal = open
        .map(|(resident, label)| render_qris_modal(&resident, &label, billing))
        .unwrap_or_default();

    let inner_content = format!(
        r#"<div class='text-center mb-12'>
            <h1 class='text-4xl font-bold text-gray-900 mb-4'>Pembayaran QRIS</h1>
            <p class='text-xl text-gray-600 max-w-3xl mx-auto'>
                Daftar warga dan nominal tagihan iuran bulanan. Klik alamat atau tombol QR untuk
                menampilkan QR Code pembayaran QRIS.
            </p>
        </div>
        {}
        <div class='bg-white rounded-xl shadow-md p-6 mb-8'>
            <div class='flex flex-col md:flex-row gap-4'>
                <div class='flex-1'>
                    <input type='search' name='q' value='{}' placeholder='Cari nama atau alamat warga...'
                        hx-get='/residents/list' hx-target='#residents-content' hx-swap='outerHTML'
                        hx-trigger='input changed delay:300ms, search'
                        class='w-full px-4 py-3 border border-gray-300 rounded-lg focus:ring-2 focus:ring-emerald-500 focus:border-emerald-500'>
                </div>
                <div class='flex items-center text-gray-600'>{}</div>
            </div>
        </div>
        {}
        {}
        <div id='modal-slot'>{}</div>"#,
        render_summary_cards(&state.directory.summary(), symbol),
        escape_html(&query),
        render_count(residents.len(), state.directory.len(), false),
        render_residents_content(&residents, symbol, &billing.components),
        render_info_section(billing),
        modal
    );

    Html(crate::page_response(&headers, "Pembayaran QRIS", "/residents", &inner_content))
}

fn render_summary_cards(summary: &DirectorySummary, symbol: &str) -> String {
    let per_resident = summary
        .amount_per_resident
        .map(|amount| format_compact(symbol, amount))
        .unwrap_or_else(|| "Bervariasi".to_string());

    format!(
        r#"<div class='grid grid-cols-1 md:grid-cols-3 gap-6 mb-8'>
            <div class='bg-white rounded-xl shadow-md p-6'><p class='text-sm font-medium text-gray-600'>Total Warga</p><p class='text-3xl font-bold text-gray-900'>{}</p></div>
            <div class='bg-white rounded-xl shadow-md p-6'><p class='text-sm font-medium text-gray-600'>Nominal per Warga</p><p class='text-3xl font-bold text-emerald-600'>{}</p></div>
            <div class='bg-white rounded-xl shadow-md p-6'><p class='text-sm font-medium text-gray-600'>Total Tagihan</p><p class='text-3xl font-bold text-orange-600'>{}</p></div>
        </div>"#,
        summary.total_residents,
        escape_html(&per_resident),
        escape_html(&format_currency(symbol, summary.total_due))
    )
}

/// Count badge; `oob` marks it for an HTMX out-of-band swap
pub fn render_count(shown: usize, total: usize, oob: bool) -> String {
    format!(
        r#"<span id='residents-count' class='text-sm font-medium'{}>Menampilkan {} dari {} warga</span>"#,
        if oob { " hx-swap-oob='true'" } else { "" },
        shown,
        total
    )
}

/// Resident table, or the empty state when nothing matches
pub fn render_residents_content(residents: &[Arc<Resident>], symbol: &str, components: &[DuesComponent]) -> String {
    if residents.is_empty() {
        return r#"<div id='residents-content' class='bg-white rounded-xl shadow-md overflow-hidden'>
            <div class='text-center py-12'>
                <p class='text-gray-500 text-lg'>Tidak ada data warga yang ditemukan</p>
                <p class='text-gray-400 text-sm'>Coba ubah kata kunci pencarian</p>
            </div>
        </div>"#
            .to_string();
    }

    let caption = components
        .iter()
        .map(|c| escape_html(&c.label))
        .collect::<Vec<_>>()
        .join(" + ");

    let rows: Vec<String> = residents
        .iter()
        .enumerate()
        .map(|(index, resident)| render_row(index + 1, resident, symbol, &caption))
        .collect();

    format!(
        r#"<div id='residents-content' class='bg-white rounded-xl shadow-md overflow-hidden'>
            <div class='overflow-x-auto'>
                <table class='w-full'>
                    <thead class='bg-emerald-50'>
                        <tr>
                            <th class='px-6 py-4 text-left text-sm font-semibold text-emerald-800 uppercase'>No</th>
                            <th class='px-6 py-4 text-left text-sm font-semibold text-emerald-800 uppercase'>Nama Warga</th>
                            <th class='px-6 py-4 text-left text-sm font-semibold text-emerald-800 uppercase'>Alamat</th>
                            <th class='px-6 py-4 text-right text-sm font-semibold text-emerald-800 uppercase'>Nominal Tagihan</th>
                            <th class='px-6 py-4 text-center text-sm font-semibold text-emerald-800 uppercase'>Aksi</th>
                        </tr>
                    </thead>
                    <tbody class='divide-y divide-gray-200'>{}</tbody>
                </table>
            </div>
        </div>"#,
        rows.join("")
    )
}

fn render_row(number: usize, resident: &Resident, symbol: &str, caption: &str) -> String {
    let select = format!(
        "hx-post='/residents/{}/select' hx-target='#modal-slot' hx-swap='innerHTML'",
        resident.id
    );
    format!(
        r#"<tr class='hover:bg-gray-50'>
            <td class='px-6 py-4'><span class='w-8 h-8 bg-emerald-100 rounded-full inline-flex items-center justify-center text-sm font-semibold text-emerald-600'>{}</span></td>
            <td class='px-6 py-4'>
                <div class='flex items-center gap-3'>
                    <span class='w-10 h-10 bg-emerald-600 rounded-full inline-flex items-center justify-center text-white font-semibold text-sm'>{}</span>
                    <div>
                        <div class='text-sm font-medium text-gray-900'>{}</div>
                        <div class='text-sm text-gray-500'>ID: {}</div>
                    </div>
                </div>
            </td>
            <td class='px-6 py-4'>
                <button {} class='text-left text-sm text-gray-900 hover:text-emerald-600 hover:underline'>{}</button>
            </td>
            <td class='px-6 py-4 text-right'>
                <div class='text-lg font-bold text-gray-900'>{}</div>
                <div class='text-xs text-gray-500'>{}</div>
            </td>
            <td class='px-6 py-4 text-center'>
                <button {} class='bg-emerald-600 text-white px-4 py-2 rounded-lg font-semibold hover:bg-emerald-700'>Tampilkan QR</button>
            </td>
        </tr>"#,
        number,
        escape_html(&initials(&resident.name)),
        escape_html(&resident.name),
        padded_id(resident.id),
        select,
        escape_html(&resident.address),
        escape_html(&format_currency(symbol, resident.amount_due)),
        caption,
        select
    )
}

fn render_info_section(billing: &BillingConfig) -> String {
    let breakdown = if billing.components.is_empty() {
        String::new()
    } else {
        let parts: Vec<String> = billing
            .components
            .iter()
            .map(|c| {
                format!(
                    "{} ({})",
                    escape_html(&c.label.to_lowercase()),
                    escape_html(&format_currency(&billing.currency_symbol, c.amount))
                )
            })
            .collect();
        format!(
            "<p>• Nominal tagihan sudah termasuk {} = {}</p>",
            parts.join(" + "),
            escape_html(&format_currency(&billing.currency_symbol, billing.components_total()))
        )
    };

    format!(
        r#"<div class='mt-8 bg-blue-50 rounded-xl p-6 border border-blue-200'>
            <h3 class='text-lg font-semibold text-blue-900 mb-2'>Informasi Pembayaran QRIS</h3>
            <div class='text-blue-800 space-y-1'>
                <p>• Klik pada alamat warga atau tombol "Tampilkan QR" untuk membuka QR Code</p>
                <p>• QR Code dapat diunduh dalam format PNG untuk disimpan</p>
                {}
                <p>• Pembayaran dapat dilakukan melalui semua aplikasi pembayaran digital yang mendukung QRIS</p>
            </div>
        </div>"#,
        breakdown
    )
}
