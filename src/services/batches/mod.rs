pub mod handlers;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::courses::requests::{BatchListParams, CreateBatchRequest, UpdateBatchRequest};

crate::services::lazy_service!(BatchService);

impl BatchService {
    pub async fn list_batches(
        &self,
        query: BatchListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::list_batches(self, query, request).await
    }

    pub async fn create_batch(
        &self,
        data: CreateBatchRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::create_batch(self, data, request).await
    }

    pub async fn get_batch(&self, batch_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        handlers::get_batch(self, batch_id, request).await
    }

    pub async fn update_batch(
        &self,
        batch_id: i64,
        data: UpdateBatchRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::update_batch(self, batch_id, data, request).await
    }

    pub async fn delete_batch(
        &self,
        batch_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::delete_batch(self, batch_id, request).await
    }
}
