use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::StudentService;
use crate::config::AppConfig;
use crate::errors::InstituteError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, not_found, require_student, storage_error_response};
use crate::utils::file_magic::file_extension;
use crate::utils::validate_magic_bytes;

const PHOTO_FIELDS: [&str; 2] = ["photo", "file"];

fn upload_failed() -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::FileUploadFailed,
        "Failed to store uploaded photo.",
    ))
}

/// 当前学员上传照片：校验扩展名、大小与魔术字节后落盘并更新档案
pub async fn upload_my_photo(
    service: &StudentService,
    request: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (_, student) = match require_student(&storage, request).await {
        Ok(pair) => pair,
        Err(resp) => return Ok(resp),
    };

    let config = AppConfig::get();
    let max_size = config.upload.max_size;

    let mut photo: Option<(String, Vec<u8>)> = None;
    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        if !PHOTO_FIELDS.contains(&name.as_str()) {
            continue;
        }
        if photo.is_some() {
            return Ok(bad_request(
                ErrorCode::FileUploadFailed,
                "Only one photo can be uploaded at a time.",
            ));
        }

        let original_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string())
            .unwrap_or_default();
        let Some(extension) = file_extension(&original_name) else {
            return Ok(bad_request(ErrorCode::FileTypeNotAllowed, "File type not allowed"));
        };
        if !config
            .upload
            .allowed_types
            .iter()
            .any(|t| t.to_lowercase() == extension)
        {
            return Ok(bad_request(ErrorCode::FileTypeNotAllowed, "File type not allowed"));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if data.len() + chunk.len() > max_size {
                return Ok(bad_request(
                    ErrorCode::FileSizeExceeded,
                    "File size exceeds the limit",
                ));
            }
            data.extend_from_slice(&chunk);
        }

        if !validate_magic_bytes(&data, &extension) {
            return Ok(bad_request(
                ErrorCode::FileTypeNotAllowed,
                "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
            ));
        }
        photo = Some((extension, data));
    }

    let Some((extension, data)) = photo else {
        return Ok(bad_request(
            ErrorCode::FileUploadFailed,
            "No photo found in upload payload",
        ));
    };

    let dir = Path::new(&config.upload.dir).join("students");
    if let Err(e) = fs::create_dir_all(&dir) {
        error!("{}", InstituteError::file_operation(format!("{e}")));
        return Ok(upload_failed());
    }
    let file_path = dir.join(format!("{}-{}{}", student.id, Uuid::new_v4(), extension));
    if let Err(e) = fs::write(&file_path, &data) {
        error!("{}", InstituteError::file_operation(format!("{e}")));
        return Ok(upload_failed());
    }
    let stored = file_path.to_string_lossy().to_string();

    match storage.update_student_photo(student.id, &stored).await {
        Ok(Some(updated)) => {
            // 旧照片不再引用
            if let Some(old) = student.photo.filter(|old| *old != stored)
                && let Err(e) = fs::remove_file(&old)
            {
                warn!("Failed to remove old photo {}: {}", old, e);
            }
            info!("Student {} uploaded a new photo", student.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                updated,
                "Photo uploaded successfully",
            )))
        }
        Ok(None) => {
            let _ = fs::remove_file(&file_path);
            Ok(not_found(ErrorCode::StudentNotFound, "Student not found."))
        }
        Err(e) => {
            let _ = fs::remove_file(&file_path);
            Ok(storage_error_response(e, ErrorCode::FileUploadFailed))
        }
    }
}
