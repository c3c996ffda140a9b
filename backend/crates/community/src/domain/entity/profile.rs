//! Profile Entities
//!
//! A user account is completed by exactly one individual or organisation
//! profile. Individuals additionally carry a karma `profile` row.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::address::{Address, NewAddress};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{AddressId, CauseId, IndividualId, OrganisationId, UserId};
use serde::Serialize;

/// Gender value that unlocks the women-only filter
pub const FEMALE: &str = "f";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub date_registered: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub id: IndividualId,
    pub user_id: UserId,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub gender: String,
    pub birthday: NaiveDate,
    pub picture_id: Option<String>,
    pub banned: bool,
    pub address_id: AddressId,
}

impl Individual {
    pub fn is_female(&self) -> bool {
        self.gender == FEMALE
    }
}

/// Karma points, bio and the women-only preference of an individual
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KarmaProfile {
    pub karma_points: i32,
    pub bio: String,
    pub women_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Organisation {
    pub id: OrganisationId,
    pub user_id: UserId,
    pub name: String,
    pub org_number: String,
    pub org_type: String,
    pub poc_first_name: String,
    pub poc_last_name: String,
    pub phone: String,
    pub low_income: bool,
    pub exempt: bool,
    pub org_register_date: Option<NaiveDate>,
    pub picture_id: Option<String>,
    pub banned: bool,
    pub address_id: AddressId,
}

/// Individual fields chosen at registration
#[derive(Debug, Clone)]
pub struct NewIndividual {
    pub user_id: UserId,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub gender: String,
    pub birthday: NaiveDate,
    pub picture_id: Option<String>,
}

impl NewIndividual {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();
        for (value, field) in [
            (&self.first_name, "firstName"),
            (&self.last_name, "lastName"),
            (&self.phone, "phoneNumber"),
            (&self.gender, "gender"),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{field} is required"));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::bad_request("Input validation failed").with_errors(errors))
        }
    }

    pub fn into_individual(self, id: IndividualId, address_id: AddressId) -> Individual {
        Individual {
            id,
            user_id: self.user_id,
            title: self.title,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            gender: self.gender,
            birthday: self.birthday,
            picture_id: self.picture_id,
            banned: false,
            address_id,
        }
    }
}

/// Organisation fields chosen at registration
#[derive(Debug, Clone)]
pub struct NewOrganisation {
    pub user_id: UserId,
    pub name: String,
    pub org_number: String,
    pub org_type: String,
    pub poc_first_name: String,
    pub poc_last_name: String,
    pub phone: String,
    pub low_income: bool,
    pub exempt: bool,
    pub org_register_date: Option<NaiveDate>,
    pub picture_id: Option<String>,
}

impl NewOrganisation {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();
        for (value, field) in [
            (&self.name, "name"),
            (&self.org_number, "organisationNumber"),
            (&self.phone, "phoneNumber"),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{field} is required"));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::bad_request("Input validation failed").with_errors(errors))
        }
    }

    pub fn into_organisation(self, id: OrganisationId, address_id: AddressId) -> Organisation {
        Organisation {
            id,
            user_id: self.user_id,
            name: self.name,
            org_number: self.org_number,
            org_type: self.org_type,
            poc_first_name: self.poc_first_name,
            poc_last_name: self.poc_last_name,
            phone: self.phone,
            low_income: self.low_income,
            exempt: self.exempt,
            org_register_date: self.org_register_date,
            picture_id: self.picture_id,
            banned: false,
            address_id,
        }
    }
}

/// Cause selected by a user, as listed on their profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileCause {
    pub id: CauseId,
    pub name: String,
    pub title: String,
}

// ============================================================================
// Profile views
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualView {
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub picture_id: Option<String>,
    pub banned: bool,
    #[serde(flatten)]
    pub karma: KarmaProfile,
    pub address: Address,
}

impl IndividualView {
    pub fn new(individual: Individual, karma: KarmaProfile, address: Address) -> Self {
        Self {
            title: individual.title,
            first_name: individual.first_name,
            last_name: individual.last_name,
            phone_number: individual.phone,
            gender: individual.gender,
            date_of_birth: individual.birthday,
            picture_id: individual.picture_id,
            banned: individual.banned,
            karma,
            address,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationView {
    pub name: String,
    pub organisation_number: String,
    pub organisation_type: String,
    pub poc_first_name: String,
    pub poc_last_name: String,
    pub phone_number: String,
    pub low_income: bool,
    pub exempt: bool,
    pub org_register_date: Option<NaiveDate>,
    pub picture_id: Option<String>,
    pub banned: bool,
    pub address: Address,
}

impl OrganisationView {
    pub fn new(organisation: Organisation, address: Address) -> Self {
        Self {
            name: organisation.name,
            organisation_number: organisation.org_number,
            organisation_type: organisation.org_type,
            poc_first_name: organisation.poc_first_name,
            poc_last_name: organisation.poc_last_name,
            phone_number: organisation.phone,
            low_income: organisation.low_income,
            exempt: organisation.exempt,
            org_register_date: organisation.org_register_date,
            picture_id: organisation.picture_id,
            banned: organisation.banned,
            address,
        }
    }
}

/// `{user, individual | organisation, causes}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub user: UserAccount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual: Option<IndividualView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<OrganisationView>,
    pub causes: Vec<ProfileCause>,
}

impl ProfileView {
    pub fn is_individual(&self) -> bool {
        self.individual.is_some()
    }
}

/// Partial address edit, applied over the stored address
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressChange {
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub postcode: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
}

impl AddressChange {
    /// The edited address, or `None` when nothing would change.
    pub fn apply_to(&self, stored: &Address) -> Option<NewAddress> {
        let edited = NewAddress {
            address_1: self.address_1.clone().unwrap_or_else(|| stored.address_1.clone()),
            address_2: self.address_2.clone().unwrap_or_else(|| stored.address_2.clone()),
            postcode: self.postcode.clone().unwrap_or_else(|| stored.postcode.clone()),
            city: self.city.clone().unwrap_or_else(|| stored.city.clone()),
            region: self.region.clone().unwrap_or_else(|| stored.region.clone()),
            lat: stored.lat,
            long: stored.long,
        };
        if edited.same_place_as(stored) {
            None
        } else {
            Some(edited)
        }
    }
}

/// Every write of one profile edit. Stores apply it all or nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileEdit {
    pub username: Option<String>,
    pub individual: Option<Individual>,
    pub karma: Option<(IndividualId, KarmaProfile)>,
    pub organisation: Option<Organisation>,
    /// Inserted first; the edited individual or organisation points at it
    pub new_address: Option<NewAddress>,
}

impl ProfileEdit {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
