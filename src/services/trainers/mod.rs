pub mod handlers;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::courses::requests::{
    CreateTrainerRequest, TrainerListParams, UpdateTrainerRequest,
};

crate::services::lazy_service!(TrainerService);

impl TrainerService {
    pub async fn list_trainers(
        &self,
        query: TrainerListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::list_trainers(self, query, request).await
    }

    pub async fn create_trainer(
        &self,
        data: CreateTrainerRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::create_trainer(self, data, request).await
    }

    pub async fn get_trainer(
        &self,
        trainer_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::get_trainer(self, trainer_id, request).await
    }

    pub async fn update_trainer(
        &self,
        trainer_id: i64,
        data: UpdateTrainerRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::update_trainer(self, trainer_id, data, request).await
    }

    pub async fn delete_trainer(
        &self,
        trainer_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::delete_trainer(self, trainer_id, request).await
    }
}
