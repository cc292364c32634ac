//! QRIS modal rendering

use iuranweb_config::BillingConfig;
use iuranweb_core::{placeholder_data_uri, Resident, EXPORT_FAILED_NOTICE};
use iuranweb_utils::{escape_html, format_currency};

const PAYMENT_STEPS: [&str; 5] = [
    "Buka aplikasi pembayaran digital (GoPay, OVO, DANA, dll)",
    "Pilih menu \"Scan QR\" atau \"Bayar\"",
    "Arahkan kamera ke QR Code di atas",
    "Konfirmasi pembayaran sesuai nominal",
    "Simpan bukti pembayaran",
];

/// Numbered "Cara Pembayaran" list
pub fn render_payment_steps() -> String {
    let items: Vec<String> = PAYMENT_STEPS
        .iter()
        .enumerate()
        .map(|(i, step)| format!("<li>{}. {}</li>", i + 1, escape_html(step)))
        .collect();
    format!(
        r#"<div class='mt-6 p-4 bg-blue-50 rounded-xl'>
            <h4 class='font-semibold text-blue-900 mb-2'>Cara Pembayaran:</h4>
            <ol class='text-sm text-blue-800 space-y-1'>{}</ol>
        </div>"#,
        items.join("")
    )
}

/// Detail modal for the selected resident
///
/// `label` is the transaction label of this open view; the same label is
/// used when the QR is exported from it.
pub fn render_qris_modal(resident: &Resident, label: &str, billing: &BillingConfig) -> String {
    let name = escape_html(&resident.name);
    format!(
        r#"<div id='qris-modal' class='fixed inset-0 bg-black/50 z-50 flex items-center justify-center p-4'>
    <div class='bg-white rounded-2xl shadow-2xl max-w-md w-full max-h-[90vh] overflow-y-auto'>
        <div class='bg-emerald-600 text-white p-6 rounded-t-2xl flex items-center justify-between'>
            <div>
                <h2 class='text-xl font-bold'>Pembayaran QRIS</h2>
                <p class='text-emerald-100 text-sm'>Scan untuk membayar</p>
            </div>
            <button hx-post='/selection/dismiss' hx-target='#modal-slot' hx-swap='innerHTML'
                class='p-2 hover:bg-white/20 rounded-full' aria-label='Tutup'>&times;</button>
        </div>
        <div class='p-6'>
            <div class='bg-gray-50 rounded-xl p-4 mb-6 space-y-3'>
                <div><p class='text-sm text-gray-600'>Nama Warga</p><p class='font-semibold text-gray-900'>{}</p></div>
                <div><p class='text-sm text-gray-600'>Alamat</p><p class='font-medium text-gray-900'>{}</p></div>
                <div><p class='text-sm text-gray-600'>ID Transaksi</p><p class='font-mono text-sm font-medium text-gray-900' id='transaction-label'>{}</p></div>
            </div>
            <div class='text-center mb-6'>
                <p class='text-sm text-gray-600 mb-1'>Total Pembayaran</p>
                <p class='text-3xl font-bold text-emerald-600'>{}</p>
            </div>
            <div class='border-2 border-gray-200 rounded-xl p-6 text-center mb-6'>
                <img src='/residents/{}/qr/preview' alt='QR Code untuk {}' class='w-48 h-48 mx-auto object-contain'
                    onerror="this.onerror=null;this.src='{}'">
                <p class='text-sm text-gray-600 mt-3'>Scan QR Code dengan aplikasi pembayaran digital Anda</p>
            </div>
            <div id='export-notice' class='mb-3 text-sm'></div>
            <button type='button' data-url='/residents/{}/qr/download' onclick='downloadQris(this)'
                class='w-full bg-emerald-600 text-white py-3 px-4 rounded-xl font-semibold hover:bg-emerald-700'>Download QR Code</button>
            <button hx-post='/residents/{}/qr/export' hx-target='#export-notice' hx-swap='innerHTML'
                class='w-full mt-2 border border-emerald-600 text-emerald-700 py-2 px-4 rounded-xl hover:bg-emerald-50'>Simpan ke Server</button>
            {}
        </div>
    </div>
</div>
<script>
function downloadQris(button) {{
    const notice = document.getElementById('export-notice');
    fetch(button.dataset.url).then(async (response) => {{
        if (!response.ok) {{
            notice.innerHTML = await response.text();
            return;
        }}
        const disposition = response.headers.get('Content-Disposition') || '';
        const encoded = disposition.match(/filename\*=UTF-8''([^;]+)/);
        const plain = disposition.match(/filename="([^"]+)"/);
        const blob = await response.blob();
        const url = window.URL.createObjectURL(blob);
        const link = document.createElement('a');
        link.href = url;
        link.download = encoded ? decodeURIComponent(encoded[1]) : (plain ? plain[1] : 'qris');
        document.body.appendChild(link);
        link.click();
        document.body.removeChild(link);
        window.URL.revokeObjectURL(url);
    }}).catch(() => {{
        notice.textContent = '{}';
    }});
}}
</script>"#,
        name,
        escape_html(&resident.address),
        escape_html(label),
        escape_html(&format_currency(&billing.currency_symbol, resident.amount_due)),
        resident.id,
        name,
        placeholder_data_uri(),
        resident.id,
        resident.id,
        render_payment_steps(),
        EXPORT_FAILED_NOTICE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resident() -> Resident {
        Resident {
            id: 2,
            name: "Siti Nurhaliza".to_string(),
            address: "Jl. Kalita Blok B No. 8".to_string(),
            amount_due: 175000,
            qr_image_ref: "https://example.test/U2.png".to_string(),
        }
    }

    #[test]
    fn test_modal_contents() {
        let html = render_qris_modal(&resident(), "TRX12345678002", &BillingConfig::default());
        assert!(html.contains("Siti Nurhaliza"));
        assert!(html.contains("Jl. Kalita Blok B No. 8"));
        assert!(html.contains("TRX12345678002"));
        assert!(html.contains("Rp 175.000"));
        assert!(html.contains("/residents/2/qr/preview"));
        assert!(html.contains("/residents/2/qr/download"));
        assert!(html.contains("hx-post='/selection/dismiss'"));
        assert!(html.contains("data:image/svg+xml"));
    }

    #[test]
    fn test_payment_steps() {
        let html = render_payment_steps();
        assert!(html.contains("Cara Pembayaran:"));
        assert!(html.contains("<li>1. Buka aplikasi"));
        assert!(html.contains("<li>5. Simpan bukti pembayaran</li>"));
        assert!(html.contains("&quot;Scan QR&quot;"));
    }
}
