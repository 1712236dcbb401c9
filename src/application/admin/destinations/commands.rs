use tracing::info;
use uuid::Uuid;

use crate::application::projection::{DestinationDto, destination_dto};
use crate::application::repos::{
    CreateDestinationParams, DestinationFlag, RepoError, UpdateDestinationParams,
};
use crate::domain::error::{ensure_in_range, ensure_non_blank};
use crate::domain::slug::validate_slug;

use super::service::AdminDestinationService;
use super::types::{
    AdminDestinationError, CreateDestinationCommand, RATING_MAX, RATING_MIN,
    UpdateDestinationCommand, ensure_coordinates, ensure_optional_non_blank,
};

impl AdminDestinationService {
    pub async fn create(
        &self,
        command: CreateDestinationCommand,
    ) -> Result<DestinationDto, AdminDestinationError> {
        ensure_non_blank(&command.name, "name")?;
        ensure_non_blank(&command.slug, "slug")?;
        ensure_non_blank(&command.category, "category")?;
        ensure_non_blank(&command.description, "description")?;
        validate_slug(&command.slug)?;
        if let Some(rating) = command.rating {
            ensure_in_range(rating, "rating", RATING_MIN, RATING_MAX)?;
        }
        if let Some(count) = command.review_count {
            ensure_in_range(f64::from(count), "reviewCount", 0.0, f64::from(i32::MAX))?;
        }
        ensure_coordinates(command.latitude, command.longitude)?;

        if self.geography.find_city(command.city_id).await?.is_none() {
            return Err(AdminDestinationError::CityNotFound(command.city_id));
        }
        if self.writer.slug_exists(&command.slug).await? {
            return Err(AdminDestinationError::DuplicateSlug(command.slug));
        }

        let slug = command.slug.clone();
        let params = CreateDestinationParams {
            name: command.name,
            slug: command.slug,
            city_id: command.city_id,
            category: command.category,
            description: command.description,
            short_description: command.short_description,
            main_image_url: command.main_image_url,
            rating: command.rating.unwrap_or(0.0),
            review_count: command.review_count.unwrap_or(0),
            best_time_to_visit: command.best_time_to_visit,
            recommended_duration: command.recommended_duration,
            difficulty_level: command.difficulty_level,
            accessibility_info: command.accessibility_info,
            history: command.history,
            culture: command.culture,
            interesting_facts: command.interesting_facts,
            latitude: command.latitude,
            longitude: command.longitude,
            is_featured: command.is_featured.unwrap_or(false),
            is_active: command.is_active.unwrap_or(true),
        };

        let record = match self.writer.create_destination(params).await {
            Ok(record) => record,
            Err(RepoError::Duplicate { .. }) => {
                return Err(AdminDestinationError::DuplicateSlug(slug));
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            target = "travelpro::admin::destinations",
            destination_id = %record.id,
            slug = %record.slug,
            "destination created"
        );
        self.invalidate(record.id, &record.slug);
        self.projection(record.id).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        command: UpdateDestinationCommand,
    ) -> Result<DestinationDto, AdminDestinationError> {
        ensure_optional_non_blank(command.name.as_deref(), "name")?;
        ensure_optional_non_blank(command.category.as_deref(), "category")?;
        ensure_optional_non_blank(command.description.as_deref(), "description")?;
        ensure_coordinates(command.latitude, command.longitude)?;

        let params = UpdateDestinationParams {
            id,
            name: command.name,
            category: command.category,
            description: command.description,
            short_description: command.short_description,
            main_image_url: command.main_image_url,
            best_time_to_visit: command.best_time_to_visit,
            recommended_duration: command.recommended_duration,
            difficulty_level: command.difficulty_level,
            accessibility_info: command.accessibility_info,
            history: command.history,
            culture: command.culture,
            latitude: command.latitude,
            longitude: command.longitude,
            is_featured: command.is_featured,
            is_active: command.is_active,
        };

        let record = self
            .writer
            .update_destination(params)
            .await
            .map_err(|err| not_found_as(id, err))?;

        self.invalidate(record.id, &record.slug);
        self.projection(record.id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AdminDestinationError> {
        let Some(existing) = self.writer.load_for_admin(id).await? else {
            return Err(AdminDestinationError::NotFound(id));
        };
        if !self.writer.delete_destination(id).await? {
            return Err(AdminDestinationError::NotFound(id));
        }
        info!(
            target = "travelpro::admin::destinations",
            destination_id = %id,
            slug = %existing.destination.slug,
            "destination deleted"
        );
        self.invalidate(id, &existing.destination.slug);
        Ok(())
    }

    pub async fn toggle_featured(&self, id: Uuid) -> Result<DestinationDto, AdminDestinationError> {
        self.toggle(id, DestinationFlag::Featured).await
    }

    pub async fn toggle_active(&self, id: Uuid) -> Result<DestinationDto, AdminDestinationError> {
        self.toggle(id, DestinationFlag::Active).await
    }

    async fn toggle(
        &self,
        id: Uuid,
        flag: DestinationFlag,
    ) -> Result<DestinationDto, AdminDestinationError> {
        let record = self
            .writer
            .toggle_flag(id, flag)
            .await
            .map_err(|err| not_found_as(id, err))?;
        self.invalidate(record.id, &record.slug);
        self.projection(record.id).await
    }

    async fn projection(&self, id: Uuid) -> Result<DestinationDto, AdminDestinationError> {
        self.writer
            .load_for_admin(id)
            .await?
            .as_ref()
            .map(destination_dto)
            .ok_or(AdminDestinationError::NotFound(id))
    }
}

fn not_found_as(id: Uuid, err: RepoError) -> AdminDestinationError {
    match err {
        RepoError::NotFound => AdminDestinationError::NotFound(id),
        other => AdminDestinationError::Repo(other),
    }
}
