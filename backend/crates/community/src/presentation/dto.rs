//! API DTOs (Data Transfer Objects)
//!
//! Registration and profile edits nest under `data`; settings and
//! notifications are flat.

use chrono::NaiveDate;
use kernel::address::NewAddress;
use kernel::caller::CurrentUser;
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::application::{
    EditProfileInput, IndividualChanges, OrganisationChanges, SendNotificationInput,
};
use crate::domain::entity::notification::Notification;
use crate::domain::entity::profile::{AddressChange, NewIndividual, NewOrganisation};
use crate::domain::entity::settings::Settings;

// ============================================================================
// Addresses
// ============================================================================

/// Address form used by the profile pages.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAddress {
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    #[serde(default)]
    pub town_city: String,
    #[serde(default)]
    pub country_state: String,
    #[serde(default)]
    pub post_code: String,
}

impl ProfileAddress {
    pub fn into_new_address(self) -> NewAddress {
        NewAddress {
            address_1: self.address_line1,
            address_2: self.address_line2,
            postcode: self.post_code,
            city: self.town_city,
            region: self.country_state,
            lat: 0.0,
            long: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAddressChange {
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub town_city: Option<String>,
    pub country_state: Option<String>,
    pub post_code: Option<String>,
}

impl From<ProfileAddressChange> for AddressChange {
    fn from(change: ProfileAddressChange) -> Self {
        AddressChange {
            address_1: change.address_line1,
            address_2: change.address_line2,
            postcode: change.post_code,
            city: change.town_city,
            region: change.country_state,
        }
    }
}

// ============================================================================
// Registration
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct IndividualSignUpData {
    pub individual: IndividualForm,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub phone_number: String,
    pub picture_id: Option<String>,
    pub address: ProfileAddress,
}

impl IndividualForm {
    pub fn into_parts(self, caller: &CurrentUser) -> (NewIndividual, NewAddress) {
        let individual = NewIndividual {
            user_id: caller.user_id,
            title: self.title,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone_number,
            gender: self.gender,
            birthday: self.date_of_birth,
            picture_id: self.picture_id,
        };
        (individual, self.address.into_new_address())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganisationSignUpData {
    pub organisation: OrganisationForm,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub organisation_number: String,
    #[serde(default)]
    pub organisation_type: String,
    #[serde(default)]
    pub low_income: bool,
    #[serde(default)]
    pub exempt: bool,
    #[serde(default)]
    pub poc_first_name: String,
    #[serde(default)]
    pub poc_last_name: String,
    #[serde(default)]
    pub phone_number: String,
    pub org_register_date: Option<NaiveDate>,
    pub picture_id: Option<String>,
    pub address: ProfileAddress,
}

impl OrganisationForm {
    pub fn into_parts(self, caller: &CurrentUser) -> (NewOrganisation, NewAddress) {
        let organisation = NewOrganisation {
            user_id: caller.user_id,
            name: self.name,
            org_number: self.organisation_number,
            org_type: self.organisation_type,
            poc_first_name: self.poc_first_name,
            poc_last_name: self.poc_last_name,
            phone: self.phone_number,
            low_income: self.low_income,
            exempt: self.exempt,
            org_register_date: self.org_register_date,
            picture_id: self.picture_id,
        };
        (organisation, self.address.into_new_address())
    }
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileQuery {
    pub other_user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileEditData {
    pub user: Option<UserEdit>,
    pub individual: Option<IndividualEdit>,
    pub organisation: Option<OrganisationEdit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserEdit {
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualEdit {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub women_only: Option<bool>,
    pub address: Option<ProfileAddressChange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationEdit {
    pub name: Option<String>,
    pub organisation_number: Option<String>,
    pub organisation_type: Option<String>,
    pub poc_first_name: Option<String>,
    pub poc_last_name: Option<String>,
    pub phone_number: Option<String>,
    pub low_income: Option<bool>,
    pub exempt: Option<bool>,
    pub address: Option<ProfileAddressChange>,
}

impl From<ProfileEditData> for EditProfileInput {
    fn from(data: ProfileEditData) -> Self {
        EditProfileInput {
            username: data.user.and_then(|user| user.username),
            individual: data.individual.map(|edit| IndividualChanges {
                first_name: edit.first_name,
                last_name: edit.last_name,
                phone: edit.phone_number,
                gender: edit.gender,
                bio: edit.bio,
                women_only: edit.women_only,
                address: edit.address.map(AddressChange::from),
            }),
            organisation: data.organisation.map(|edit| OrganisationChanges {
                name: edit.name,
                org_number: edit.organisation_number,
                org_type: edit.organisation_type,
                poc_first_name: edit.poc_first_name,
                poc_last_name: edit.poc_last_name,
                phone: edit.phone_number,
                low_income: edit.low_income,
                exempt: edit.exempt,
                address: edit.address.map(AddressChange::from),
            }),
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsRequest {
    pub email: Option<i16>,
    pub notifications: Option<i16>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsResponse {
    pub settings: Settings,
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    pub receiver_ids: Option<Vec<UserId>>,
    pub receiver_id: Option<UserId>,
}

impl From<NotificationRequest> for SendNotificationInput {
    fn from(req: NotificationRequest) -> Self {
        SendNotificationInput {
            kind: req.kind,
            message: req.message,
            receiver_ids: req.receiver_ids,
            receiver_id: req.receiver_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}

// ============================================================================
// Information
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InformationQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::response::DataBody;
    use serde_json::json;

    #[test]
    fn test_individual_form_maps_address_lines() {
        let body: DataBody<IndividualSignUpData> = serde_json::from_value(json!({
            "data": {"individual": {
                "title": "Mr.",
                "firstName": "Paul",
                "lastName": "Test",
                "dateOfBirth": "1990-05-17",
                "gender": "m",
                "phoneNumber": "07500000000",
                "address": {
                    "addressLine1": "7 Queen Lane",
                    "addressLine2": "",
                    "townCity": "London",
                    "countryState": "UK",
                    "postCode": "WC2R 2LS"
                }
            }}
        }))
        .unwrap();

        let caller = CurrentUser {
            user_id: UserId::new(4),
        };
        let (individual, address) = body.data.individual.into_parts(&caller);
        assert_eq!(individual.user_id, UserId::new(4));
        assert_eq!(individual.phone, "07500000000");
        assert_eq!(address.address_1, "7 Queen Lane");
        assert_eq!(address.city, "London");
        assert_eq!(address.region, "UK");
        assert_eq!(address.postcode, "WC2R 2LS");
    }

    #[test]
    fn test_profile_edit_is_partial() {
        let data: ProfileEditData = serde_json::from_value(json!({
            "user": {"username": "paul2"},
            "individual": {"womenOnly": true, "address": {"townCity": "Leeds"}}
        }))
        .unwrap();

        let input = EditProfileInput::from(data);
        assert_eq!(input.username.as_deref(), Some("paul2"));
        let individual = input.individual.unwrap();
        assert_eq!(individual.women_only, Some(true));
        assert!(individual.first_name.is_none());
        let address = individual.address.unwrap();
        assert_eq!(address.city.as_deref(), Some("Leeds"));
        assert!(address.postcode.is_none());
        assert!(input.organisation.is_none());
    }

    #[test]
    fn test_notification_request_shape() {
        let req: NotificationRequest = serde_json::from_value(json!({
            "type": "Cancellation",
            "message": "Event cancelled",
            "receiverIds": [2, 3]
        }))
        .unwrap();
        let input = SendNotificationInput::from(req);
        assert_eq!(input.kind, "Cancellation");
        assert_eq!(input.receiver_ids.unwrap().len(), 2);
        assert!(input.receiver_id.is_none());
    }
}
