use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use fleetdesk_core::date;
use fleetdesk_core::{DomainError, DomainResult, Entity, FormData, Upload, UserId};

use fleetdesk_auth::{Role, validate_email};

/// A person known to the API: the signed-in profile, an entry of
/// `GET /user`, or a driver from `GET /user/drivers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "userid")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    /// Wallet balance.
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_role: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aadhar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driving_licence_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driving_licence_back_url: Option<String>,
    #[serde(
        with = "date::optional",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub driving_licence_validity: Option<NaiveDate>,
}

/// Document images attached to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    ProfileImage,
    /// Aadhaar identity proof.
    IdentityProof,
    LicenceFront,
    LicenceBack,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::ProfileImage,
        DocumentKind::IdentityProof,
        DocumentKind::LicenceFront,
        DocumentKind::LicenceBack,
    ];

    /// Multipart field name used when uploading this document.
    pub fn field_name(&self) -> &'static str {
        match self {
            DocumentKind::ProfileImage => "image",
            DocumentKind::IdentityProof => "aadhar",
            DocumentKind::LicenceFront => "drivingLicence",
            DocumentKind::LicenceBack => "drivingLicenceBack",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentState {
    Missing,
    /// Server-relative path of the stored image.
    Uploaded(String),
}

impl DocumentState {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, DocumentState::Uploaded(_))
    }
}

impl User {
    pub fn document(&self, kind: DocumentKind) -> DocumentState {
        let path = match kind {
            DocumentKind::ProfileImage => &self.image_url,
            DocumentKind::IdentityProof => &self.aadhar_url,
            DocumentKind::LicenceFront => &self.driving_licence_url,
            DocumentKind::LicenceBack => &self.driving_licence_back_url,
        };
        match path.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => DocumentState::Uploaded(p.to_string()),
            _ => DocumentState::Missing,
        }
    }

    pub fn missing_documents(&self) -> Vec<DocumentKind> {
        DocumentKind::ALL
            .into_iter()
            .filter(|kind| !self.document(*kind).is_uploaded())
            .collect()
    }

    pub fn role(&self) -> Option<Role> {
        self.user_role
    }
}

/// Profile fields a user can edit one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Name,
    Email,
    PhoneNumber,
}

impl ProfileField {
    pub fn field_name(&self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::Email => "email",
            ProfileField::PhoneNumber => "phoneNumber",
        }
    }

    pub fn current<'a>(&self, user: &'a User) -> &'a str {
        match self {
            ProfileField::Name => &user.name,
            ProfileField::Email => &user.email,
            ProfileField::PhoneNumber => &user.phone_number,
        }
    }

    /// Single-field multipart body for `PUT /user/profile/update`.
    pub fn form(&self, value: &str) -> DomainResult<FormData> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DomainError::validation(format!(
                "{} cannot be empty",
                self.field_name()
            )));
        }
        if *self == ProfileField::Email {
            validate_email(value)?;
        }
        Ok(FormData::new().text(self.field_name(), value))
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Add-driver form as collected from the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverDraft {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub amount: Option<f64>,
    pub driving_licence_validity: Option<NaiveDate>,
    pub image: Option<Upload>,
    pub aadhar: Option<Upload>,
    pub driving_licence: Option<Upload>,
    pub driving_licence_back: Option<Upload>,
}

/// A complete `POST /driver/create-driver` submission.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDriver {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub amount: f64,
    pub driving_licence_validity: NaiveDate,
    pub image: Upload,
    pub aadhar: Upload,
    pub driving_licence: Upload,
    pub driving_licence_back: Option<Upload>,
}

impl DriverDraft {
    /// All text fields, the validity date, the photo, the identity proof and
    /// the licence front are required; the licence back is optional.
    pub fn complete(self) -> DomainResult<NewDriver> {
        let missing_text = [&self.name, &self.email, &self.phone_number, &self.password]
            .iter()
            .any(|f| f.trim().is_empty());

        match (
            missing_text,
            self.amount,
            self.driving_licence_validity,
            self.image,
            self.aadhar,
            self.driving_licence,
        ) {
            (false, Some(amount), Some(validity), Some(image), Some(aadhar), Some(licence)) => {
                Ok(NewDriver {
                    name: self.name,
                    email: self.email,
                    phone_number: self.phone_number,
                    password: self.password,
                    amount,
                    driving_licence_validity: validity,
                    image,
                    aadhar,
                    driving_licence: licence,
                    driving_licence_back: self.driving_licence_back,
                })
            }
            _ => Err(DomainError::validation(
                "Please fill all fields and upload required files",
            )),
        }
    }
}

impl NewDriver {
    pub fn into_form_data(self) -> FormData {
        FormData::new()
            .text("name", self.name)
            .text("email", self.email)
            .text("phoneNumber", self.phone_number)
            .text("password", self.password)
            .text("amount", self.amount.to_string())
            .text(
                "drivingLicenceValidity",
                date::format_wire_date(self.driving_licence_validity),
            )
            .file(DocumentKind::ProfileImage.field_name(), self.image)
            .file(DocumentKind::IdentityProof.field_name(), self.aadhar)
            .file(DocumentKind::LicenceFront.field_name(), self.driving_licence)
            .file_opt(
                DocumentKind::LicenceBack.field_name(),
                self.driving_licence_back,
            )
    }
}
