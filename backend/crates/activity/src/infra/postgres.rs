//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::address::{Address, Coordinates, NewAddress};
use kernel::id::{AddressId, CauseId, EventId, IndividualId, UserId};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::entity::{
    cause::Cause,
    event::{CreationLimit, Event, EventSummary, NewEvent},
    signup::{Attendee, Participant, SignUp},
};
use crate::domain::repository::{
    CauseRepository, EventRepository, EventScope, EventSelection, FavouriteRepository,
    SignUpRepository, Timeframe,
};
use crate::error::{ActivityError, ActivityResult};

/// PostgreSQL-backed activity repository
#[derive(Clone)]
pub struct PgActivityRepository {
    pool: PgPool,
}

impl PgActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const EVENT_COLUMNS: &str = "e.id, e.name, e.address_id, e.women_only, e.spots, \
    e.address_visible, e.minimum_age, e.photo_id, e.physical, e.add_info, e.content, \
    e.date, e.user_id, e.creation_date";

const ADDRESS_COLUMNS: &str = "id, address_1, address_2, postcode, city, region, lat, long";

// ============================================================================
// Event Repository Implementation
// ============================================================================

impl EventRepository for PgActivityRepository {
    async fn find_participant(&self, user_id: UserId) -> ActivityResult<Option<Participant>> {
        let row = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT u.id AS user_id,
                   i.id AS individual_id,
                   COALESCE(ia.lat, oa.lat) AS lat,
                   COALESCE(ia.long, oa.long) AS long
            FROM users u
            LEFT JOIN individual i ON i.user_id = u.id
            LEFT JOIN address ia ON ia.id = i.address_id
            LEFT JOIN organisation o ON o.user_id = u.id
            LEFT JOIN address oa ON oa.id = o.address_id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ParticipantRow::into_participant))
    }

    async fn count_events_created_since(
        &self,
        user_id: UserId,
        since: DateTime<Utc>,
    ) -> ActivityResult<usize> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM event WHERE user_id = $1 AND creation_date > $2",
        )
        .bind(user_id.value())
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn insert_address(&self, address: &NewAddress) -> ActivityResult<Address> {
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
        .fetch_one(&self.pool)
        .await?;

        Ok(address.clone().into_address(AddressId::new(id)))
    }

    async fn find_address(&self, address_id: AddressId) -> ActivityResult<Option<Address>> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM address WHERE id = $1"
        ))
        .bind(address_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AddressRow::into_address))
    }

    async fn update_address(&self, address: &Address) -> ActivityResult<()> {
        sqlx::query(
            r#"
            UPDATE address
            SET address_1 = $2, address_2 = $3, postcode = $4, city = $5,
                region = $6, lat = $7, long = $8
            WHERE id = $1
            "#,
        )
        .bind(address.id.value())
        .bind(&address.address_1)
        .bind(&address.address_2)
        .bind(&address.postcode)
        .bind(&address.city)
        .bind(&address.region)
        .bind(address.lat)
        .bind(address.long)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_event(
        &self,
        event: &NewEvent,
        causes: &[CauseId],
        limit: Option<CreationLimit>,
    ) -> ActivityResult<Event> {
        let mut tx = self.pool.begin().await?;
        let d = &event.draft;

        if let Some(limit) = limit {
            // Serializes concurrent creations by the same user
            sqlx::query("SELECT 1 FROM users WHERE id = $1 FOR UPDATE")
                .bind(event.user_id.value())
                .execute(&mut *tx)
                .await?;

            let created = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM event WHERE user_id = $1 AND creation_date > $2",
            )
            .bind(event.user_id.value())
            .bind(limit.since)
            .fetch_one(&mut *tx)
            .await?;

            if usize::try_from(created).unwrap_or_default() >= limit.max {
                return Err(ActivityError::CreationLimitReached(limit.max));
            }
        }

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO event (name, address_id, women_only, spots, address_visible,
                               minimum_age, photo_id, physical, add_info, content, date,
                               user_id, creation_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(&d.name)
        .bind(event.address_id.value())
        .bind(d.women_only)
        .bind(d.spots)
        .bind(d.address_visible)
        .bind(d.minimum_age)
        .bind(d.photo_id)
        .bind(d.physical)
        .bind(d.add_info)
        .bind(&d.content)
        .bind(d.date)
        .bind(event.user_id.value())
        .bind(event.creation_date)
        .fetch_one(&mut *tx)
        .await?;

        let cause_ids: Vec<i32> = causes.iter().map(|c| c.value()).collect();
        sqlx::query(
            "INSERT INTO event_cause (event_id, cause_id) SELECT $1, UNNEST($2::int4[])",
        )
        .bind(id)
        .bind(&cause_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(event.clone().into_event(EventId::new(id)))
    }

    async fn find_event(&self, event_id: EventId) -> ActivityResult<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM event e WHERE e.id = $1"
        ))
        .bind(event_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(EventRow::into_event))
    }

    async fn update_event(&self, event: &Event) -> ActivityResult<()> {
        sqlx::query(
            r#"
            UPDATE event
            SET name = $2, address_id = $3, women_only = $4, spots = $5,
                address_visible = $6, minimum_age = $7, photo_id = $8, physical = $9,
                add_info = $10, content = $11, date = $12
            WHERE id = $1
            "#,
        )
        .bind(event.id.value())
        .bind(&event.name)
        .bind(event.address_id.value())
        .bind(event.women_only)
        .bind(event.spots)
        .bind(event.address_visible)
        .bind(event.minimum_age)
        .bind(event.photo_id)
        .bind(event.physical)
        .bind(event.add_info)
        .bind(&event.content)
        .bind(event.date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_event(&self, event_id: EventId) -> ActivityResult<()> {
        let mut tx = self.pool.begin().await?;

        for statement in [
            "DELETE FROM event_cause WHERE event_id = $1",
            "DELETE FROM sign_up WHERE event_id = $1",
            "DELETE FROM favourite WHERE event_id = $1",
            "DELETE FROM event WHERE id = $1",
        ] {
            sqlx::query(statement)
                .bind(event_id.value())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_events(&self, selection: &EventSelection) -> ActivityResult<Vec<EventSummary>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT ");
        query.push(EVENT_COLUMNS).push(
            r#",
                   a.address_1, a.address_2, a.postcode, a.city, a.region, a.lat, a.long,
                   COALESCE((SELECT array_agg(s.individual_id) FROM sign_up s
                             WHERE s.event_id = e.id), '{}') AS volunteers,
                   COALESCE((SELECT array_agg(f.individual_id) FROM favourite f
                             WHERE f.event_id = e.id), '{}') AS favourited_by,
                   COALESCE((SELECT array_agg(ec.cause_id) FROM event_cause ec
                             WHERE ec.event_id = e.id), '{}') AS causes
            FROM event e
            JOIN address a ON a.id = e.address_id
            WHERE TRUE"#,
        );

        push_selection(&mut query, selection);
        query.push(" ORDER BY e.date ASC");

        let rows = query
            .build_query_as::<EventSummaryRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(EventSummaryRow::into_summary).collect())
    }

    async fn event_causes(&self, event_id: EventId) -> ActivityResult<Vec<Cause>> {
        let rows = sqlx::query_as::<_, CauseRow>(
            r#"
            SELECT c.id, c.name, c.title, c.description
            FROM cause c
            JOIN event_cause ec ON ec.cause_id = c.id
            WHERE ec.event_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(event_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CauseRow::into_cause).collect())
    }

    async fn count_signups(&self, event_id: EventId) -> ActivityResult<usize> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sign_up WHERE event_id = $1")
                .bind(event_id.value())
                .fetch_one(&self.pool)
                .await?;

        Ok(usize::try_from(count).unwrap_or_default())
    }
}

/// Append the scope, timeframe and filter predicates of `selection`.
fn push_selection(query: &mut QueryBuilder<'_, Postgres>, selection: &EventSelection) {
    match selection.timeframe {
        Timeframe::Upcoming => {
            query.push(" AND e.date > ").push_bind(selection.now);
        }
        Timeframe::Past => {
            query.push(" AND e.date <= ").push_bind(selection.now);
        }
        Timeframe::Any => {}
    }

    match selection.scope {
        EventScope::All => {}
        EventScope::SelectedCauses(user_id) => {
            query
                .push(
                    " AND EXISTS (SELECT 1 FROM event_cause ec \
                     JOIN selected_cause sc ON sc.cause_id = ec.cause_id \
                     WHERE ec.event_id = e.id AND sc.user_id = ",
                )
                .push_bind(user_id.value())
                .push(")");
        }
        EventScope::FavouritedBy(individual_id) => {
            query
                .push(" AND EXISTS (SELECT 1 FROM favourite f WHERE f.event_id = e.id AND f.individual_id = ")
                .push_bind(individual_id.value())
                .push(")");
        }
        EventScope::SignedUpBy(individual_id) => {
            query
                .push(" AND EXISTS (SELECT 1 FROM sign_up s WHERE s.event_id = e.id AND s.individual_id = ")
                .push_bind(individual_id.value())
                .push(")");
        }
        EventScope::AttendedBy(individual_id) => {
            query
                .push(
                    " AND EXISTS (SELECT 1 FROM sign_up s WHERE s.event_id = e.id \
                     AND s.attended AND s.individual_id = ",
                )
                .push_bind(individual_id.value())
                .push(")");
        }
    }

    let filters = &selection.filters;
    for (filter, wanted) in &filters.booleans {
        query
            .push(" AND e.")
            .push(filter.column())
            .push(" = ")
            .push_bind(*wanted);
    }
    if let Some(start) = filters.availability_start {
        query.push(" AND e.date::date >= ").push_bind(start);
    }
    if let Some(end) = filters.availability_end {
        query.push(" AND e.date::date <= ").push_bind(end);
    }
}

// ============================================================================
// Signup Repository Implementation
// ============================================================================

impl SignUpRepository for PgActivityRepository {
    async fn insert_signup(&self, signup: &SignUp) -> ActivityResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sign_up (individual_id, event_id, confirmed, attended)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(signup.individual_id.value())
        .bind(signup.event_id.value())
        .bind(signup.confirmed)
        .bind(signup.attended)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_signup(
        &self,
        individual_id: IndividualId,
        event_id: EventId,
    ) -> ActivityResult<Option<SignUp>> {
        let row = sqlx::query_as::<_, SignUpRow>(
            r#"
            SELECT individual_id, event_id, confirmed, attended
            FROM sign_up
            WHERE individual_id = $1 AND event_id = $2
            "#,
        )
        .bind(individual_id.value())
        .bind(event_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SignUpRow::into_signup))
    }

    async fn update_signup(&self, signup: &SignUp) -> ActivityResult<()> {
        sqlx::query(
            r#"
            UPDATE sign_up SET confirmed = $3, attended = $4
            WHERE individual_id = $1 AND event_id = $2
            "#,
        )
        .bind(signup.individual_id.value())
        .bind(signup.event_id.value())
        .bind(signup.confirmed)
        .bind(signup.attended)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_signup(
        &self,
        individual_id: IndividualId,
        event_id: EventId,
    ) -> ActivityResult<bool> {
        let deleted =
            sqlx::query("DELETE FROM sign_up WHERE individual_id = $1 AND event_id = $2")
                .bind(individual_id.value())
                .bind(event_id.value())
                .execute(&self.pool)
                .await?
                .rows_affected();

        Ok(deleted > 0)
    }

    async fn list_attendees(&self, event_id: EventId) -> ActivityResult<Vec<Attendee>> {
        let rows = sqlx::query_as::<_, AttendeeRow>(
            r#"
            SELECT i.id AS individual_id, u.id AS user_id, u.username, u.email,
                   i.firstname, i.lastname, i.phone, s.confirmed, s.attended
            FROM sign_up s
            JOIN individual i ON i.id = s.individual_id
            JOIN users u ON u.id = i.user_id
            WHERE s.event_id = $1
            ORDER BY i.lastname, i.firstname
            "#,
        )
        .bind(event_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AttendeeRow::into_attendee).collect())
    }
}

// ============================================================================
// Favourite Repository Implementation
// ============================================================================

impl FavouriteRepository for PgActivityRepository {
    async fn insert_favourite(
        &self,
        individual_id: IndividualId,
        event_id: EventId,
    ) -> ActivityResult<()> {
        sqlx::query(
            r#"
            INSERT INTO favourite (individual_id, event_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(individual_id.value())
        .bind(event_id.value())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_favourite(
        &self,
        individual_id: IndividualId,
        event_id: EventId,
    ) -> ActivityResult<bool> {
        let deleted =
            sqlx::query("DELETE FROM favourite WHERE individual_id = $1 AND event_id = $2")
                .bind(individual_id.value())
                .bind(event_id.value())
                .execute(&self.pool)
                .await?
                .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Cause Repository Implementation
// ============================================================================

impl CauseRepository for PgActivityRepository {
    async fn list_causes(&self) -> ActivityResult<Vec<Cause>> {
        let rows = sqlx::query_as::<_, CauseRow>(
            "SELECT id, name, title, description FROM cause ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CauseRow::into_cause).collect())
    }

    async fn find_cause(&self, cause_id: CauseId) -> ActivityResult<Option<Cause>> {
        let row = sqlx::query_as::<_, CauseRow>(
            "SELECT id, name, title, description FROM cause WHERE id = $1",
        )
        .bind(cause_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CauseRow::into_cause))
    }

    async fn selected_causes(&self, user_id: UserId) -> ActivityResult<Vec<Cause>> {
        let rows = sqlx::query_as::<_, CauseRow>(
            r#"
            SELECT c.id, c.name, c.title, c.description
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

    async fn replace_selected_causes(
        &self,
        user_id: UserId,
        causes: &[CauseId],
    ) -> ActivityResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM selected_cause WHERE user_id = $1")
            .bind(user_id.value())
            .execute(&mut *tx)
            .await?;

        let cause_ids: Vec<i32> = causes.iter().map(|c| c.value()).collect();
        sqlx::query(
            "INSERT INTO selected_cause (user_id, cause_id) SELECT $1, UNNEST($2::int4[])",
        )
        .bind(user_id.value())
        .bind(&cause_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct ParticipantRow {
    user_id: i32,
    individual_id: Option<i32>,
    lat: Option<f64>,
    long: Option<f64>,
}

impl ParticipantRow {
    fn into_participant(self) -> Participant {
        Participant {
            user_id: UserId::new(self.user_id),
            individual_id: self.individual_id.map(IndividualId::new),
            location: self
                .lat
                .zip(self.long)
                .map(|(lat, long)| Coordinates { lat, long }),
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
struct EventRow {
    id: i32,
    name: String,
    address_id: i32,
    women_only: bool,
    spots: i32,
    address_visible: bool,
    minimum_age: i32,
    photo_id: bool,
    physical: bool,
    add_info: bool,
    content: String,
    date: DateTime<Utc>,
    user_id: i32,
    creation_date: DateTime<Utc>,
}

impl EventRow {
    fn into_event(self) -> Event {
        Event {
            id: EventId::new(self.id),
            name: self.name,
            address_id: AddressId::new(self.address_id),
            women_only: self.women_only,
            spots: self.spots,
            address_visible: self.address_visible,
            minimum_age: self.minimum_age,
            photo_id: self.photo_id,
            physical: self.physical,
            add_info: self.add_info,
            content: self.content,
            date: self.date,
            user_id: UserId::new(self.user_id),
            creation_date: self.creation_date,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EventSummaryRow {
    #[sqlx(flatten)]
    event: EventRow,
    address_1: String,
    address_2: String,
    postcode: String,
    city: String,
    region: String,
    lat: f64,
    long: f64,
    volunteers: Vec<i32>,
    favourited_by: Vec<i32>,
    causes: Vec<i32>,
}

impl EventSummaryRow {
    fn into_summary(self) -> EventSummary {
        let address = Address {
            id: AddressId::new(self.event.address_id),
            address_1: self.address_1,
            address_2: self.address_2,
            postcode: self.postcode,
            city: self.city,
            region: self.region,
            lat: self.lat,
            long: self.long,
        };

        EventSummary {
            event: self.event.into_event(),
            address,
            volunteers: self.volunteers.into_iter().map(IndividualId::new).collect(),
            favourited_by: self
                .favourited_by
                .into_iter()
                .map(IndividualId::new)
                .collect(),
            causes: self.causes.into_iter().map(CauseId::new).collect(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct SignUpRow {
    individual_id: i32,
    event_id: i32,
    confirmed: bool,
    attended: bool,
}

impl SignUpRow {
    fn into_signup(self) -> SignUp {
        SignUp {
            individual_id: IndividualId::new(self.individual_id),
            event_id: EventId::new(self.event_id),
            confirmed: self.confirmed,
            attended: self.attended,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AttendeeRow {
    individual_id: i32,
    user_id: i32,
    username: String,
    email: String,
    firstname: String,
    lastname: String,
    phone: String,
    confirmed: bool,
    attended: bool,
}

impl AttendeeRow {
    fn into_attendee(self) -> Attendee {
        Attendee {
            individual_id: IndividualId::new(self.individual_id),
            user_id: UserId::new(self.user_id),
            username: self.username,
            email: self.email,
            first_name: self.firstname,
            last_name: self.lastname,
            phone: self.phone,
            confirmed: self.confirmed,
            attended: self.attended,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CauseRow {
    id: i32,
    name: String,
    title: String,
    description: String,
}

impl CauseRow {
    fn into_cause(self) -> Cause {
        Cause {
            id: CauseId::new(self.id),
            name: self.name,
            title: self.title,
            description: self.description,
        }
    }
}
