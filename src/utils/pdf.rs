//! 收据与证书的 PDF 生成（printpdf 内置字体，纯文本排版）

use chrono::NaiveDate;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use std::path::{Path, PathBuf};

use crate::config::{AppConfig, InstituteConfig};
use crate::errors::{InstituteError, Result};

pub struct CertificateDocument {
    pub certificate_no: String,
    pub student_name: String,
    pub reg_no: Option<String>,
    pub course_title: String,
    pub duration: String,
    pub issue_date: NaiveDate,
    pub verify_url: String,
}

pub struct ReceiptDocument {
    pub receipt_no: String,
    pub student_name: String,
    pub reg_no: Option<String>,
    pub course_title: Option<String>,
    pub batch_code: Option<String>,
    pub amount: f64,
    pub mode: String,
    pub txn_id: String,
    pub date: NaiveDate,
    pub posted_by: Option<String>,
}

/// 内置字体只支持 WinAnsi，其余字符替换为 '?'
fn pdf_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

fn render_error(e: printpdf::Error) -> InstituteError {
    InstituteError::document_render(format!("PDF 生成失败: {e}"))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

struct Writer {
    layer: PdfLayerReference,
    fonts: Fonts,
    y: f32,
}

impl Writer {
    fn line(&mut self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold {
            &self.fonts.bold
        } else {
            &self.fonts.regular
        };
        self.layer
            .use_text(pdf_text(text), size, Mm(x), Mm(self.y), font);
        // 行距约为字号的 0.5 倍毫米
        self.y -= size * 0.5 + 2.0;
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }
}

fn build<F>(title: &str, width: f32, height: f32, draw: F) -> Result<Vec<u8>>
where
    F: FnOnce(&mut Writer),
{
    let (doc, page, layer) = PdfDocument::new(pdf_text(title), Mm(width), Mm(height), "content");
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_error)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_error)?,
    };
    let mut writer = Writer {
        layer: doc.get_page(page).get_layer(layer),
        fonts,
        y: height - 25.0,
    };
    draw(&mut writer);
    doc.save_to_bytes().map_err(render_error)
}

pub fn render_certificate(cert: &CertificateDocument, institute: &InstituteConfig) -> Result<Vec<u8>> {
    // A4 横向
    build(&cert.certificate_no, 297.0, 210.0, |w| {
        w.line(&institute.name, 24.0, 30.0, true);
        w.line(&institute.address, 11.0, 30.0, false);
        w.gap(12.0);
        w.line("CERTIFICATE OF COMPLETION", 28.0, 30.0, true);
        w.gap(8.0);
        w.line("This is to certify that", 13.0, 30.0, false);
        w.line(&cert.student_name, 22.0, 30.0, true);
        if let Some(reg_no) = &cert.reg_no {
            w.line(&format!("Registration No: {reg_no}"), 11.0, 30.0, false);
        }
        w.gap(4.0);
        w.line("has successfully completed the course", 13.0, 30.0, false);
        w.line(&cert.course_title, 18.0, 30.0, true);
        w.line(&format!("Duration: {}", cert.duration), 12.0, 30.0, false);
        w.gap(10.0);
        w.line(&format!("Certificate No: {}", cert.certificate_no), 11.0, 30.0, false);
        w.line(
            &format!("Issue Date: {}", cert.issue_date.format("%d %B %Y")),
            11.0,
            30.0,
            false,
        );
        w.line(&format!("Verify at: {}", cert.verify_url), 9.0, 30.0, false);
    })
}

pub fn render_receipt(receipt: &ReceiptDocument, institute: &InstituteConfig) -> Result<Vec<u8>> {
    let amount = format!("{} {:.2}", institute.currency_symbol, receipt.amount);
    build(&receipt.receipt_no, 210.0, 297.0, |w| {
        w.line(&institute.name, 20.0, 20.0, true);
        w.line(&institute.address, 10.0, 20.0, false);
        if !institute.phone.is_empty() {
            w.line(&format!("Phone: {}", institute.phone), 10.0, 20.0, false);
        }
        w.gap(10.0);
        w.line("FEES RECEIPT", 18.0, 20.0, true);
        w.gap(4.0);
        w.line(&format!("Receipt No: {}", receipt.receipt_no), 11.0, 20.0, false);
        w.line(&format!("Date: {}", receipt.date.format("%d-%m-%Y")), 11.0, 20.0, false);
        w.gap(4.0);
        w.line(&format!("Student: {}", receipt.student_name), 12.0, 20.0, false);
        if let Some(reg_no) = &receipt.reg_no {
            w.line(&format!("Registration No: {reg_no}"), 11.0, 20.0, false);
        }
        if let Some(course) = &receipt.course_title {
            w.line(&format!("Course: {course}"), 11.0, 20.0, false);
        }
        if let Some(batch) = &receipt.batch_code {
            w.line(&format!("Batch: {batch}"), 11.0, 20.0, false);
        }
        w.gap(4.0);
        w.line(&format!("Amount Paid: {amount}"), 14.0, 20.0, true);
        w.line(&format!("Payment Mode: {}", receipt.mode), 11.0, 20.0, false);
        if !receipt.txn_id.is_empty() {
            w.line(&format!("Transaction ID: {}", receipt.txn_id), 11.0, 20.0, false);
        }
        if let Some(posted_by) = &receipt.posted_by {
            w.gap(8.0);
            w.line(&format!("Received by: {posted_by}"), 10.0, 20.0, false);
        }
        w.gap(6.0);
        w.line("This is a computer generated receipt.", 9.0, 20.0, false);
    })
}

/// 写入文档目录，返回保存的路径
pub fn save_document(file_name: &str, bytes: &[u8]) -> Result<String> {
    let dir = PathBuf::from(&AppConfig::get().upload.documents_dir);
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes)?;
    Ok(path.to_string_lossy().into_owned())
}

/// 读取已保存的文档，文件缺失时返回 None
pub fn load_document(path: &str) -> Result<Option<Vec<u8>>> {
    if !Path::new(path).exists() {
        return Ok(None);
    }
    Ok(Some(std::fs::read(path)?))
}

/// `Content-Disposition` 里使用的文件名
pub fn attachment_name(prefix: &str, number: &str) -> String {
    let safe: String = number
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    format!("{prefix}_{safe}.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn institute() -> InstituteConfig {
        InstituteConfig {
            name: "Skill Centre".to_string(),
            address: "Station Road".to_string(),
            phone: "0471 255 000".to_string(),
            currency_symbol: "Rs.".to_string(),
        }
    }

    #[test]
    fn test_render_certificate() {
        let cert = CertificateDocument {
            certificate_no: "CERT-20250301-0001".to_string(),
            student_name: "Anjali Nair".to_string(),
            reg_no: Some("STU2025-0001".to_string()),
            course_title: "Web Development".to_string(),
            duration: "3 Months".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            verify_url: "http://localhost/verify-certificate/abc".to_string(),
        };
        let bytes = render_certificate(&cert, &institute()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_receipt_with_non_ascii_name() {
        let receipt = ReceiptDocument {
            receipt_no: "RCP-000001".to_string(),
            student_name: "Zoë ₹".to_string(),
            reg_no: None,
            course_title: Some("Tally".to_string()),
            batch_code: None,
            amount: 2500.0,
            mode: "UPI".to_string(),
            txn_id: "UPI123".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            posted_by: Some("Office".to_string()),
        };
        let bytes = render_receipt(&receipt, &institute()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_pdf_text_and_attachment_name() {
        assert_eq!(pdf_text("Zoë"), "Zo?");
        assert_eq!(attachment_name("Receipt", "RCP-000001"), "Receipt_RCP-000001.pdf");
        assert_eq!(attachment_name("Certificate", "../x"), "Certificate_x.pdf");
    }
}
