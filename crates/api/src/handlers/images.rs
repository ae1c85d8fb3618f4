//! Handlers for the `/images` resource: gallery listing, detail with
//! slideshow, multipart upload/edit, delete and re-categorization.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use imgview_core::error::CoreError;
use imgview_core::pagination::{clamp_limit, clamp_offset, Page, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use imgview_core::permissions::ensure_can_manage_image;
use imgview_core::slideshow::{initial_index, neighbors};
use imgview_core::storage::{sniff_image, validate_upload_extension};
use imgview_core::types::DbId;
use imgview_core::validation::{parse_optional_id, validate_image_title, INVALID_CATEGORY_CHOICE};
use imgview_db::models::category::Category;
use imgview_db::models::image::{CreateImageItem, ImageCategoryInput, ImageItem, UpdateImageItem};
use imgview_db::repositories::{CategoryRepo, ImageRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::IdPath;
use crate::media::MediaStore;
use crate::middleware::rbac::CurrentGrants;
use crate::query::ImageListParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// An image row plus the public URL of its file.
#[derive(Debug, Serialize)]
pub struct ImageView {
    #[serde(flatten)]
    pub item: ImageItem,
    pub image_url: String,
}

impl From<ImageItem> for ImageView {
    fn from(item: ImageItem) -> Self {
        let image_url = MediaStore::url_for(&item.image_path);
        Self { item, image_url }
    }
}

/// Gallery page: the images, every category for the filter bar, and the
/// active filter.
#[derive(Debug, Serialize)]
pub struct ImageListResponse {
    pub images: Page<ImageView>,
    pub categories: Vec<Category>,
    pub selected_category_id: Option<DbId>,
}

/// Detail view with the slideshow of sibling images.
#[derive(Debug, Serialize)]
pub struct ImageDetailResponse {
    pub image: ImageView,
    /// Same category as `image` (or all uncategorized images), newest first.
    pub slides: Vec<ImageView>,
    /// Position of `image` within `slides`.
    pub initial_index: usize,
    pub previous_id: Option<DbId>,
    pub next_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Multipart form
// ---------------------------------------------------------------------------

struct UploadedFile {
    file_name: String,
    bytes: Vec<u8>,
}

/// Fields of the upload/edit form. Unknown fields are ignored.
#[derive(Default)]
struct ImageForm {
    title: Option<String>,
    category_id: Option<String>,
    image: Option<UploadedFile>,
}

impl ImageForm {
    async fn read(multipart: &mut Multipart) -> AppResult<Self> {
        let mut form = ImageForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "title" => {
                    form.title = Some(
                        field
                            .text()
                            .await
                            .map_err(multipart_error)?,
                    );
                }
                "category_id" => {
                    form.category_id = Some(
                        field
                            .text()
                            .await
                            .map_err(multipart_error)?,
                    );
                }
                "image" => {
                    let file_name = field.file_name().unwrap_or("").to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(multipart_error)?;
                    // A file input left empty still submits a nameless part.
                    if !(file_name.is_empty() && bytes.is_empty()) {
                        form.image = Some(UploadedFile {
                            file_name,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }

    fn title(&self) -> AppResult<String> {
        Ok(validate_image_title(self.title.as_deref().unwrap_or(""))?)
    }
}

/// Oversized bodies keep their 413; every other stream error is a 400.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Uploaded file exceeds the maximum allowed size".into())
    } else {
        AppError::BadRequest(err.body_text())
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/images?category=&limit=&offset=
///
/// Public gallery, newest first. A blank `category` means all images.
pub async fn list_images(
    State(state): State<AppState>,
    Query(params): Query<ImageListParams>,
) -> AppResult<Json<DataResponse<ImageListResponse>>> {
    let selected = parse_optional_id("category", params.category.as_deref())?;
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);

    let items = ImageRepo::list(&state.pool, selected, limit, offset).await?;
    let total = ImageRepo::count(&state.pool, selected).await?;
    let categories = CategoryRepo::list_all(&state.pool).await?;

    let images = Page::new(
        items.into_iter().map(ImageView::from).collect(),
        total,
        limit,
        offset,
    );

    Ok(Json(DataResponse {
        data: ImageListResponse {
            images,
            categories,
            selected_category_id: selected,
        },
    }))
}

/// GET /api/v1/images/{id}
pub async fn get_image(
    State(state): State<AppState>,
    IdPath(id): IdPath<DbId>,
) -> AppResult<Json<DataResponse<ImageDetailResponse>>> {
    let image = find_image(&state, id).await?;

    let slides = ImageRepo::list_slides(&state.pool, image.category_id).await?;
    let slide_ids: Vec<DbId> = slides.iter().map(|s| s.id).collect();
    let index = initial_index(&slide_ids, image.id);
    let (previous_id, next_id) = neighbors(&slide_ids, index);

    Ok(Json(DataResponse {
        data: ImageDetailResponse {
            image: image.into(),
            slides: slides.into_iter().map(ImageView::from).collect(),
            initial_index: index,
            previous_id,
            next_id,
        },
    }))
}

/// POST /api/v1/images
///
/// Multipart fields: `title` (required), `category_id` (optional, blank for
/// none), `image` (required file). The caller becomes the owner.
pub async fn upload_image(
    State(state): State<AppState>,
    CurrentGrants(grants): CurrentGrants,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<ImageView>>)> {
    let form = ImageForm::read(&mut multipart).await?;

    let title = form.title()?;
    let category_id = resolve_category(&state, form.category_id.as_deref()).await?;
    let file = form.image.as_ref().ok_or_else(|| {
        AppError::Core(CoreError::Validation("Image file is required".into()))
    })?;

    let image_path = store_upload(&state, file).await?;

    let created = ImageRepo::create(
        &state.pool,
        &CreateImageItem {
            title,
            created_by: Some(grants.user_id),
            category_id,
            image_path: image_path.clone(),
        },
    )
    .await;

    let image = match created {
        Ok(image) => image,
        Err(e) => {
            state.media.remove(&image_path).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        user_id = grants.user_id,
        image_id = image.id,
        category_id = ?image.category_id,
        "Image uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: image.into() }),
    ))
}

/// PUT /api/v1/images/{id}
///
/// Full edit with the same fields as upload. `image` is optional; when given
/// it replaces the stored file. A blank or missing `category_id` clears the
/// category.
pub async fn update_image(
    State(state): State<AppState>,
    CurrentGrants(grants): CurrentGrants,
    IdPath(id): IdPath<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<ImageView>>> {
    let existing = find_image(&state, id).await?;
    ensure_can_manage_image(&grants, id, existing.created_by)?;

    let form = ImageForm::read(&mut multipart).await?;
    let title = form.title()?;
    let category_id = resolve_category(&state, form.category_id.as_deref()).await?;

    let new_path = match &form.image {
        Some(file) => Some(store_upload(&state, file).await?),
        None => None,
    };

    let updated = ImageRepo::update(
        &state.pool,
        id,
        &UpdateImageItem {
            title,
            category_id,
            image_path: new_path.clone(),
        },
    )
    .await;

    let image = match updated {
        Ok(Some(image)) => image,
        Ok(None) => {
            if let Some(path) = &new_path {
                state.media.remove(path).await;
            }
            return Err(AppError::Core(CoreError::NotFound { entity: "Image", id }));
        }
        Err(e) => {
            if let Some(path) = &new_path {
                state.media.remove(path).await;
            }
            return Err(e.into());
        }
    };

    if new_path.is_some() {
        state.media.remove(&existing.image_path).await;
    }

    tracing::info!(
        user_id = grants.user_id,
        image_id = id,
        file_replaced = new_path.is_some(),
        "Image updated"
    );

    Ok(Json(DataResponse { data: image.into() }))
}

/// DELETE /api/v1/images/{id}
///
/// Removes the row and its stored file. Returns 204 No Content.
pub async fn delete_image(
    State(state): State<AppState>,
    CurrentGrants(grants): CurrentGrants,
    IdPath(id): IdPath<DbId>,
) -> AppResult<StatusCode> {
    let existing = find_image(&state, id).await?;
    ensure_can_manage_image(&grants, id, existing.created_by)?;

    let path = ImageRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Image", id }))?;
    state.media.remove(&path).await;

    tracing::info!(user_id = grants.user_id, image_id = id, "Image deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/images/{id}/category
///
/// Body: `{ "category_id": 3 }` or `{ "category_id": null }`.
pub async fn update_image_category(
    State(state): State<AppState>,
    CurrentGrants(grants): CurrentGrants,
    IdPath(id): IdPath<DbId>,
    Json(input): Json<ImageCategoryInput>,
) -> AppResult<Json<DataResponse<ImageView>>> {
    let existing = find_image(&state, id).await?;
    ensure_can_manage_image(&grants, id, existing.created_by)?;

    if let Some(category_id) = input.category_id {
        ensure_category_exists(&state, category_id).await?;
    }

    let image = ImageRepo::set_category(&state.pool, id, input.category_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Image", id }))?;

    tracing::info!(
        user_id = grants.user_id,
        image_id = id,
        category_id = ?input.category_id,
        "Image re-categorized"
    );

    Ok(Json(DataResponse { data: image.into() }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_image(state: &AppState, id: DbId) -> AppResult<ImageItem> {
    ImageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Image", id }))
}

/// Parse the form's category field and check the category exists.
async fn resolve_category(state: &AppState, raw: Option<&str>) -> AppResult<Option<DbId>> {
    let category_id = parse_optional_id("category_id", raw)?;
    if let Some(id) = category_id {
        ensure_category_exists(state, id).await?;
    }
    Ok(category_id)
}

async fn ensure_category_exists(state: &AppState, id: DbId) -> AppResult<()> {
    if CategoryRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            INVALID_CATEGORY_CHOICE.into(),
        )));
    }
    Ok(())
}

/// Check the upload and write it to the media store.
async fn store_upload(state: &AppState, file: &UploadedFile) -> AppResult<String> {
    validate_upload_extension(&file.file_name)?;
    let sniffed = sniff_image(&file.bytes)?;
    let path = state.media.save(sniffed.extension, &file.bytes).await?;
    tracing::debug!(
        path = %path,
        width = sniffed.width,
        height = sniffed.height,
        bytes = file.bytes.len(),
        "Stored upload"
    );
    Ok(path)
}
