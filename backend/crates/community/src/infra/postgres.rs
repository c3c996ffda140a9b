//! PostgreSQL Repository Implementations

use chrono::{DateTime, NaiveDate, Utc};
use kernel::address::{Address, NewAddress};
use kernel::id::{AddressId, CauseId, IndividualId, NotificationId, OrganisationId, UserId};
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::entity::{
    information::Information,
    notification::{NewNotification, Notification},
    profile::{
        Individual, KarmaProfile, NewIndividual, NewOrganisation, Organisation, ProfileCause,
        ProfileEdit, UserAccount,
    },
    settings::Settings,
};
use crate::domain::repository::{
    InformationRepository, NotificationRepository, ProfileRepository, SettingsRepository,
};
use crate::error::CommunityResult;

/// PostgreSQL-backed community repository
#[derive(Clone)]
pub struct PgCommunityRepository {
    pool: PgPool,
}

impl PgCommunityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const INDIVIDUAL_COLUMNS: &str = "i.id, i.user_id, i.title, i.firstname, i.lastname, i.phone, \
    i.gender, i.birthday, i.picture_id, i.banned, i.address_id";

const ORGANISATION_COLUMNS: &str = "id, user_id, org_name, org_number, org_type, poc_firstname, \
    poc_lastname, phone, low_income, exempt, org_register_date, picture_id, banned, address_id";

async fn insert_address_in(
    tx: &mut Transaction<'_, Postgres>,
    address: &NewAddress,
) -> CommunityResult<AddressId> {
    let id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO address (address_1, address_2, postcode, city, region, lat, long)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(&address.address_1)
    .bind(&address.address_2)
    .bind(&address.postcode)
    .bind(&address.city)
    .bind(&address.region)
    .bind(address.lat)
    .bind(address.long)
    .fetch_one(&mut **tx)
    .await?;

    Ok(AddressId::new(id))
}

// ============================================================================
// Profile Repository Implementation
// ============================================================================

impl ProfileRepository for PgCommunityRepository {
    async fn find_account(&self, user_id: UserId) -> CommunityResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, username, email, date_registered FROM users WHERE id = $1",
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AccountRow::into_account))
    }

    async fn profile_exists(&self, user_id: UserId) -> CommunityResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM individual WHERE user_id = $1)
                OR EXISTS (SELECT 1 FROM organisation WHERE user_id = $1)
            "#,
        )
        .bind(user_id.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn username_taken(&self, username: &str, except: UserId) -> CommunityResult<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 AND id <> $2)",
        )
        .bind(username)
        .bind(except.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn insert_individual(
        &self,
        individual: &NewIndividual,
        address: &NewAddress,
    ) -> CommunityResult<Individual> {
        let mut tx = self.pool.begin().await?;
        let address_id = insert_address_in(&mut tx, address).await?;

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO individual (user_id, title, firstname, lastname, phone, gender,
                                    birthday, picture_id, banned, address_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, $9)
            RETURNING id
            "#,
        )
        .bind(individual.user_id.value())
        .bind(&individual.title)
        .bind(&individual.first_name)
        .bind(&individual.last_name)
        .bind(&individual.phone)
        .bind(&individual.gender)
        .bind(individual.birthday)
        .bind(&individual.picture_id)
        .bind(address_id.value())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO profile (individual_id, karma_points, bio, women_only) VALUES ($1, 0, '', FALSE)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(individual
            .clone()
            .into_individual(IndividualId::new(id), address_id))
    }

    async fn insert_organisation(
        &self,
        organisation: &NewOrganisation,
        address: &NewAddress,
    ) -> CommunityResult<Organisation> {
        let mut tx = self.pool.begin().await?;
        let address_id = insert_address_in(&mut tx, address).await?;

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO organisation (user_id, org_name, org_number, org_type, poc_firstname,
                                      poc_lastname, phone, low_income, exempt,
                                      org_register_date, picture_id, banned, address_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, FALSE, $12)
            RETURNING id
            "#,
        )
        .bind(organisation.user_id.value())
        .bind(&organisation.name)
        .bind(&organisation.org_number)
        .bind(&organisation.org_type)
        .bind(&organisation.poc_first_name)
        .bind(&organisation.poc_last_name)
        .bind(&organisation.phone)
        .bind(organisation.low_income)
        .bind(organisation.exempt)
        .bind(organisation.org_register_date)
        .bind(&organisation.picture_id)
        .bind(address_id.value())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(organisation
            .clone()
            .into_organisation(OrganisationId::new(id), address_id))
    }

    async fn find_individual(
        &self,
        user_id: UserId,
    ) -> CommunityResult<Option<(Individual, KarmaProfile)>> {
        let row = sqlx::query_as::<_, IndividualRow>(&format!(
            r#"
            SELECT {INDIVIDUAL_COLUMNS},
                   COALESCE(p.karma_points, 0) AS karma_points,
                   COALESCE(p.bio, '') AS bio,
                   COALESCE(p.women_only, FALSE) AS women_only
            FROM individual i
            LEFT JOIN profile p ON p.individual_id = i.id
            WHERE i.user_id = $1
            "#
        ))
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(IndividualRow::into_parts))
    }

    async fn find_organisation(&self, user_id: UserId) -> CommunityResult<Option<Organisation>> {
        let row = sqlx::query_as::<_, OrganisationRow>(&format!(
            "SELECT {ORGANISATION_COLUMNS} FROM organisation WHERE user_id = $1"
        ))
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(OrganisationRow::into_organisation))
    }

    async fn find_profile_address(&self, address_id: AddressId) -> CommunityResult<Option<Address>> {
        let row = sqlx::query_as::<_, AddressRow>(
            r#"
            SELECT id, address_1, address_2, postcode, city, region, lat, long
            FROM address WHERE id = $1
            "#,
        )
        .bind(address_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AddressRow::into_address))
    }

    async fn save_profile_edit(&self, user_id: UserId, edit: &ProfileEdit) -> CommunityResult<()> {
        let mut tx = self.pool.begin().await?;

        let moved_to = match &edit.new_address {
            Some(address) => Some(insert_address_in(&mut tx, address).await?),
            None => None,
        };

        if let Some(individual) = &edit.individual {
            let address_id = moved_to.unwrap_or(individual.address_id);
            sqlx::query(
                r#"
                UPDATE individual
                SET firstname = $2, lastname = $3, phone = $4, gender = $5, address_id = $6
                WHERE id = $1
                "#,
            )
            .bind(individual.id.value())
            .bind(&individual.first_name)
            .bind(&individual.last_name)
            .bind(&individual.phone)
            .bind(&individual.gender)
            .bind(address_id.value())
            .execute(&mut *tx)
            .await?;
        }

        if let Some((individual_id, karma)) = &edit.karma {
            sqlx::query(
                r#"
                INSERT INTO profile (individual_id, karma_points, bio, women_only)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (individual_id)
                DO UPDATE SET karma_points = EXCLUDED.karma_points,
                              bio = EXCLUDED.bio,
                              women_only = EXCLUDED.women_only
                "#,
            )
            .bind(individual_id.value())
            .bind(karma.karma_points)
            .bind(&karma.bio)
            .bind(karma.women_only)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(organisation) = &edit.organisation {
            let address_id = moved_to.unwrap_or(organisation.address_id);
            sqlx::query(
                r#"
                UPDATE organisation
                SET org_name = $2, org_number = $3, org_type = $4, poc_firstname = $5,
                    poc_lastname = $6, phone = $7, low_income = $8, exempt = $9, address_id = $10
                WHERE id = $1
                "#,
            )
            .bind(organisation.id.value())
            .bind(&organisation.name)
            .bind(&organisation.org_number)
            .bind(&organisation.org_type)
            .bind(&organisation.poc_first_name)
            .bind(&organisation.poc_last_name)
            .bind(&organisation.phone)
            .bind(organisation.low_income)
            .bind(organisation.exempt)
            .bind(address_id.value())
            .execute(&mut *tx)
            .await?;
        }

        if let Some(username) = &edit.username {
            sqlx::query("UPDATE users SET username = $2 WHERE id = $1")
                .bind(user_id.value())
                .bind(username)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn profile_causes(&self, user_id: UserId) -> CommunityResult<Vec<ProfileCause>> {
        let rows = sqlx::query_as::<_, CauseRow>(
            r#"
            SELECT c.id, c.name, c.title
            FROM cause c
            JOIN selected_cause sc ON sc.cause_id = c.id
            WHERE sc.user_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CauseRow::into_cause).collect())
    }
}

// ============================================================================
// Settings Repository Implementation
// ============================================================================

impl SettingsRepository for PgCommunityRepository {
    async fn find_settings(&self, user_id: UserId) -> CommunityResult<Option<Settings>> {
        let row = sqlx::query_as::<_, (i16, i16)>(
            "SELECT email, notifications FROM settings WHERE user_id = $1",
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(email, notifications)| Settings {
            email,
            notifications,
        }))
    }

    async fn save_settings(&self, user_id: UserId, settings: &Settings) -> CommunityResult<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (user_id, email, notifications)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET email = EXCLUDED.email, notifications = EXCLUDED.notifications
            "#,
        )
        .bind(user_id.value())
        .bind(settings.email)
        .bind(settings.notifications)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Notification Repository Implementation
// ============================================================================

impl NotificationRepository for PgCommunityRepository {
    async fn unknown_users(&self, user_ids: &[UserId]) -> CommunityResult<Vec<UserId>> {
        let ids: Vec<i32> = user_ids.iter().map(|id| id.value()).collect();
        let unknown = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT wanted.id
            FROM UNNEST($1::int4[]) AS wanted(id)
            WHERE NOT EXISTS (SELECT 1 FROM users u WHERE u.id = wanted.id)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(unknown.into_iter().map(UserId::new).collect())
    }

    async fn insert_notifications(
        &self,
        notification: &NewNotification,
        receivers: &[UserId],
    ) -> CommunityResult<Vec<Notification>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(receivers.len());

        for receiver in receivers {
            let id = sqlx::query_scalar::<_, i32>(
                r#"
                INSERT INTO notification (type, message, timestamp_sent, sender_id, receiver_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#,
            )
            .bind(&notification.kind)
            .bind(&notification.message)
            .bind(notification.timestamp_sent)
            .bind(notification.sender_id.value())
            .bind(receiver.value())
            .fetch_one(&mut *tx)
            .await?;

            created.push(notification.for_receiver(NotificationId::new(id), *receiver));
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn notifications_for(&self, receiver_id: UserId) -> CommunityResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, type, message, timestamp_sent, sender_id, receiver_id
            FROM notification
            WHERE receiver_id = $1
            ORDER BY timestamp_sent DESC, id DESC
            "#,
        )
        .bind(receiver_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(NotificationRow::into_notification).collect())
    }
}

// ============================================================================
// Information Repository Implementation
// ============================================================================

impl InformationRepository for PgCommunityRepository {
    async fn find_information(&self, kind: &str) -> CommunityResult<Option<Information>> {
        let row = sqlx::query_as::<_, (String, String)>(
            "SELECT type, content FROM information WHERE type = $1",
        )
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(kind, content)| Information { kind, content }))
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i32,
    username: String,
    email: String,
    date_registered: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> UserAccount {
        UserAccount {
            user_id: UserId::new(self.id),
            username: self.username,
            email: self.email,
            date_registered: self.date_registered,
        }
    }
}

#[derive(sqlx::FromRow)]
struct IndividualRow {
    id: i32,
    user_id: i32,
    title: String,
    firstname: String,
    lastname: String,
    phone: String,
    gender: String,
    birthday: NaiveDate,
    picture_id: Option<String>,
    banned: bool,
    address_id: i32,
    karma_points: i32,
    bio: String,
    women_only: bool,
}

impl IndividualRow {
    fn into_parts(self) -> (Individual, KarmaProfile) {
        let individual = Individual {
            id: IndividualId::new(self.id),
            user_id: UserId::new(self.user_id),
            title: self.title,
            first_name: self.firstname,
            last_name: self.lastname,
            phone: self.phone,
            gender: self.gender,
            birthday: self.birthday,
            picture_id: self.picture_id,
            banned: self.banned,
            address_id: AddressId::new(self.address_id),
        };
        let karma = KarmaProfile {
            karma_points: self.karma_points,
            bio: self.bio,
            women_only: self.women_only,
        };
        (individual, karma)
    }
}

#[derive(sqlx::FromRow)]
struct OrganisationRow {
    id: i32,
    user_id: i32,
    org_name: String,
    org_number: String,
    org_type: String,
    poc_firstname: String,
    poc_lastname: String,
    phone: String,
    low_income: bool,
    exempt: bool,
    org_register_date: Option<NaiveDate>,
    picture_id: Option<String>,
    banned: bool,
    address_id: i32,
}

impl OrganisationRow {
    fn into_organisation(self) -> Organisation {
        Organisation {
            id: OrganisationId::new(self.id),
            user_id: UserId::new(self.user_id),
            name: self.org_name,
            org_number: self.org_number,
            org_type: self.org_type,
            poc_first_name: self.poc_firstname,
            poc_last_name: self.poc_lastname,
            phone: self.phone,
            low_income: self.low_income,
            exempt: self.exempt,
            org_register_date: self.org_register_date,
            picture_id: self.picture_id,
            banned: self.banned,
            address_id: AddressId::new(self.address_id),
        }
    }
}

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: i32,
    address_1: String,
    address_2: String,
    postcode: String,
    city: String,
    region: String,
    lat: f64,
    long: f64,
}

impl AddressRow {
    fn into_address(self) -> Address {
        Address {
            id: AddressId::new(self.id),
            address_1: self.address_1,
            address_2: self.address_2,
            postcode: self.postcode,
            city: self.city,
            region: self.region,
            lat: self.lat,
            long: self.long,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CauseRow {
    id: i32,
    name: String,
    title: String,
}

impl CauseRow {
    fn into_cause(self) -> ProfileCause {
        ProfileCause {
            id: CauseId::new(self.id),
            name: self.name,
            title: self.title,
        }
    }
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: i32,
    #[sqlx(rename = "type")]
    kind: String,
    message: String,
    timestamp_sent: DateTime<Utc>,
    sender_id: i32,
    receiver_id: i32,
}

impl NotificationRow {
    fn into_notification(self) -> Notification {
        Notification {
            id: NotificationId::new(self.id),
            kind: self.kind,
            message: self.message,
            timestamp_sent: self.timestamp_sent,
            sender_id: UserId::new(self.sender_id),
            receiver_id: UserId::new(self.receiver_id),
        }
    }
}
