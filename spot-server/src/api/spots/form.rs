//! Spot form (create / edit)
//!
//! Both routes post `multipart/form-data` with an optional `image` file.
//! The raw strings are kept so a rejected form can be handed back as-is.

use axum::extract::Multipart;
use serde::{Deserialize, Serialize};
use shared::models::{NoiseLevel, SpotType, Location, parse_purchase_required};

use crate::db::models::SpotDraft;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Submitted spot fields, unvalidated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpotForm {
    pub name: String,
    pub address: String,
    pub location: String,
    pub spot_type: String,
    pub purchase_required: String,
    pub noise_level: String,
    pub description: String,
}

/// File part of the form
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

fn message_of(err: AppError) -> String {
    match err {
        AppError::Validation(msg) => msg,
        other => other.to_string(),
    }
}

impl SpotForm {
    /// Assign a text field by its form name; unknown names are ignored
    fn set(&mut self, field: &str, value: String) {
        let slot = match field {
            "name" | "fitem" => &mut self.name,
            "address" | "faddress" => &mut self.address,
            "location" | "flocation" => &mut self.location,
            "spot_type" | "type" | "ftype" => &mut self.spot_type,
            "purchase_required" | "fpurchase" => &mut self.purchase_required,
            "noise_level" | "fnoise" => &mut self.noise_level,
            "description" | "fdescription" => &mut self.description,
            _ => return,
        };
        *slot = value;
    }

    fn check(&self) -> AppResult<SpotDraft> {
        validate_required_text(&self.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&self.address, "address", MAX_ADDRESS_LEN)?;
        validate_optional_text(&Some(self.description.clone()), "description", MAX_TEXT_LEN)?;

        let location: Location = self
            .location
            .trim()
            .parse()
            .map_err(|e: shared::models::ParseEnumError| AppError::validation(e.to_string()))?;
        let spot_type: SpotType = self
            .spot_type
            .trim()
            .parse()
            .map_err(|e: shared::models::ParseEnumError| AppError::validation(e.to_string()))?;
        let noise_level: NoiseLevel = self
            .noise_level
            .trim()
            .parse()
            .map_err(|e: shared::models::ParseEnumError| AppError::validation(e.to_string()))?;
        let purchase_required = if self.purchase_required.trim().is_empty() {
            false
        } else {
            parse_purchase_required(&self.purchase_required)
                .map_err(|e| AppError::validation(e.to_string()))?
        };

        Ok(SpotDraft {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            location,
            spot_type,
            purchase_required,
            noise_level,
            description: self.description.trim().to_string(),
        })
    }

    /// Validate into a draft; failures carry the submitted form back
    pub fn validate(&self) -> AppResult<SpotDraft> {
        self.check()
            .map_err(|e| AppError::invalid_form(message_of(e), self))
    }

    /// Reject with this form attached
    pub fn reject(&self, err: AppError) -> AppError {
        match err {
            AppError::Validation(msg) => AppError::invalid_form(msg, self),
            other => other,
        }
    }
}

/// Read text fields and the optional `image` part
///
/// An empty file part (no file chosen in the browser) counts as no image.
pub async fn read_spot_multipart(
    mut multipart: Multipart,
) -> AppResult<(SpotForm, Option<UploadedFile>)> {
    let mut form = SpotForm::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" || name == "file" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await?.to_vec();
            if !data.is_empty() || !filename.is_empty() {
                image = Some(UploadedFile { filename, data });
            }
            continue;
        }
        let value = field.text().await?;
        form.set(&name, value);
    }

    Ok((form, image))
}
