//! 证书与收据 PDF 的生成、落盘与下载响应

use actix_web::HttpResponse;
use actix_web::http::header;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::certificates::entities::CertificateDetail;
use crate::models::courses::entities::duration_text;
use crate::models::finance::entities::ReceiptDetail;
use crate::storage::Storage;
use crate::utils::pdf::{
    CertificateDocument, ReceiptDocument, attachment_name, load_document, render_certificate,
    render_receipt, save_document,
};

/// 证书公开校验地址
pub fn verify_url(qr_hash: &str) -> String {
    format!(
        "{}/verify-certificate/{}",
        AppConfig::get().frontend_base(),
        qr_hash
    )
}

fn certificate_document(detail: &CertificateDetail) -> CertificateDocument {
    CertificateDocument {
        certificate_no: detail.certificate.certificate_no.clone(),
        student_name: detail.student_name.clone(),
        reg_no: detail.reg_no.clone(),
        course_title: detail.course_title.clone(),
        duration: duration_text(detail.duration_weeks),
        issue_date: detail.certificate.issue_date,
        verify_url: verify_url(&detail.certificate.qr_hash),
    }
}

fn receipt_document(detail: &ReceiptDetail) -> ReceiptDocument {
    let receipt = &detail.receipt;
    ReceiptDocument {
        receipt_no: receipt.receipt_no.clone(),
        student_name: detail.student_name.clone(),
        reg_no: detail.reg_no.clone(),
        course_title: detail.course_title.clone(),
        batch_code: detail.batch_code.clone(),
        amount: receipt.amount,
        mode: receipt.mode.label().to_string(),
        txn_id: receipt.txn_id.clone(),
        date: receipt.date,
        posted_by: detail.posted_by_name.clone(),
    }
}

/// 渲染证书并记录保存路径
pub async fn generate_certificate_pdf(
    storage: &Arc<dyn Storage>,
    detail: &CertificateDetail,
) -> Result<Vec<u8>> {
    let config = AppConfig::get();
    let bytes = render_certificate(&certificate_document(detail), &config.institute)?;
    let path = save_document(
        &attachment_name("certificate", &detail.certificate.certificate_no),
        &bytes,
    )?;
    storage
        .set_certificate_pdf_path(detail.certificate.id, &path)
        .await?;
    debug!("Certificate PDF saved to {}", path);
    Ok(bytes)
}

/// 读取已保存的证书，文件缺失时重新生成
pub async fn ensure_certificate_pdf(
    storage: &Arc<dyn Storage>,
    detail: &CertificateDetail,
) -> Result<Vec<u8>> {
    if let Some(path) = &detail.certificate.pdf_path {
        if let Some(bytes) = load_document(path)? {
            return Ok(bytes);
        }
        warn!("Certificate PDF missing at {}, regenerating", path);
    }
    generate_certificate_pdf(storage, detail).await
}

pub async fn generate_receipt_pdf(
    storage: &Arc<dyn Storage>,
    detail: &ReceiptDetail,
) -> Result<Vec<u8>> {
    let config = AppConfig::get();
    let bytes = render_receipt(&receipt_document(detail), &config.institute)?;
    let path = save_document(
        &attachment_name("receipt", &detail.receipt.receipt_no),
        &bytes,
    )?;
    storage.set_receipt_pdf_path(detail.receipt.id, &path).await?;
    debug!("Receipt PDF saved to {}", path);
    Ok(bytes)
}

pub async fn ensure_receipt_pdf(
    storage: &Arc<dyn Storage>,
    detail: &ReceiptDetail,
) -> Result<Vec<u8>> {
    if let Some(path) = &detail.receipt.pdf_path {
        if let Some(bytes) = load_document(path)? {
            return Ok(bytes);
        }
        warn!("Receipt PDF missing at {}, regenerating", path);
    }
    generate_receipt_pdf(storage, detail).await
}

/// 以附件形式返回 PDF
pub fn pdf_response(bytes: Vec<u8>, file_name: String) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "application/pdf"))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ))
        .body(bytes)
}
