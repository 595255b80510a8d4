// src/services/rating_service.rs

use std::sync::Arc;

use crate::{
    common::error::{AppError, Resource},
    db::VoluntaryWorkStore,
    models::voluntary_work::{FeedbackEntry, RatingEntry},
    services::work_locks::WorkLocks,
};

#[derive(Clone)]
pub struct RatingService {
    works: Arc<dyn VoluntaryWorkStore>,
    locks: WorkLocks,
}

impl RatingService {
    pub fn new(works: Arc<dyn VoluntaryWorkStore>, locks: WorkLocks) -> Self {
        Self { works, locks }
    }

    /// Acrescenta a nota e devolve a nova média. Não há limite de faixa.
    pub async fn put_rating(&self, work_id: i64, rating: f64, volunteer_name: &str) -> Result<f64, AppError> {
        let _guard = self.locks.lock(work_id).await;

        let entry = RatingEntry { volunteer_name: volunteer_name.to_string(), rating };
        let avg_rating = self
            .works
            .append_rating(work_id, &entry)
            .await?
            .ok_or(AppError::NotFound(Resource::VoluntaryWork))?;

        tracing::info!("⭐ Trabalho {} avaliado por {} (média {:.2}).", work_id, volunteer_name, avg_rating);
        Ok(avg_rating)
    }

    pub async fn put_feedback(&self, work_id: i64, feedback: &str, volunteer_name: &str) -> Result<(), AppError> {
        let _guard = self.locks.lock(work_id).await;

        let entry = FeedbackEntry { volunteer_name: volunteer_name.to_string(), feedback: feedback.to_string() };
        if !self.works.append_feedback(work_id, &entry).await? {
            return Err(AppError::NotFound(Resource::VoluntaryWork));
        }

        tracing::info!("💬 Feedback de {} no trabalho {}.", volunteer_name, work_id);
        Ok(())
    }
}
