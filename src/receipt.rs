//! Printable booking receipt (one A4 page).

use std::io::BufWriter;

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::models::{Appointment, NotificationChannel};

const TITLE: &str = "Comprovante de Agendamento - UPA";
const REMINDER: &str = "Chegue com 15 minutos de antecedência e leve um documento com foto. \
Em caso de sinais graves (dor no peito, falta de ar, desmaio) procure imediatamente uma \
Emergência Hospitalar.";

#[derive(Debug, thiserror::Error)]
pub enum ReceiptError {
    #[error("PDF font error: {0}")]
    Font(String),
    #[error("PDF save error: {0}")]
    Save(String),
    #[error("PDF buffer error: {0}")]
    Buffer(String),
}

fn channel_label(channel: NotificationChannel) -> &'static str {
    match channel {
        NotificationChannel::Sms => "SMS",
        NotificationChannel::Whatsapp => "WhatsApp",
        NotificationChannel::Both => "SMS e WhatsApp",
    }
}

/// Receipt lines as (label, value), in print order.
pub fn receipt_fields(appointment: &Appointment) -> Vec<(&'static str, String)> {
    vec![
        ("Protocolo", appointment.id.to_uppercase()),
        ("Unidade", appointment.upa_name.clone()),
        ("Especialidade", appointment.specialty.clone()),
        ("Data", appointment.date.clone()),
        ("Horário", appointment.time.clone()),
        ("Paciente", appointment.patient_name.clone()),
        ("CPF", appointment.cpf.clone()),
        ("Lembretes via", channel_label(appointment.notification_channel).to_string()),
        ("Situação", appointment.status.display_label().to_string()),
    ]
}

/// Render the receipt. Returns PDF bytes.
pub fn generate_receipt_pdf(appointment: &Appointment) -> Result<Vec<u8>, ReceiptError> {
    let (doc, page1, layer1) = PdfDocument::new(TITLE, Mm(210.0), Mm(297.0), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReceiptError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReceiptError::Font(e.to_string()))?;

    let mut y = Mm(280.0);
    layer.use_text(TITLE, 14.0, Mm(20.0), y, &bold);
    y -= Mm(12.0);

    for (label, value) in receipt_fields(appointment) {
        layer.use_text(format!("{label}:"), 10.0, Mm(20.0), y, &bold);
        layer.use_text(value, 10.0, Mm(60.0), y, &font);
        y -= Mm(7.0);
    }

    y -= Mm(6.0);
    for line in wrap_text(REMINDER, 85) {
        layer.use_text(line, 9.0, Mm(20.0), y, &font);
        y -= Mm(4.5);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReceiptError::Save(e.to_string()))?;
    buf.into_inner()
        .map_err(|e| ReceiptError::Buffer(e.to_string()))
}

/// Greedy word wrap on character count.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let width = current.chars().count() + word.chars().count() + 1;
        if width > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
