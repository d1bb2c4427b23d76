use super::{
    models, password, schema, AdminId, OpenHouseStore, OpenHouseStoreFacade, ReservationFilter,
    ReservationId, StoreError,
};
use crate::auth_session::SessionToken;
use crate::booking::{ConflictField, Station};
use crate::data_store::auth_token::AdminToken;
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;

#[derive(Clone)]
pub struct PgDataStore {
    pool: diesel::r2d2::Pool<diesel::r2d2::ConnectionManager<PgConnection>>,
}

impl PgDataStore {
    pub fn new(database_url: &str) -> Result<Self, StoreError> {
        let connection_manager = diesel::r2d2::ConnectionManager::<PgConnection>::new(database_url);
        Ok(Self {
            pool: diesel::r2d2::Pool::builder()
                .test_on_check_out(true)
                .min_idle(Some(2))
                .build(connection_manager)?,
        })
    }
}

impl OpenHouseStore for PgDataStore {
    fn get_facade<'a>(&'a self) -> Result<Box<dyn OpenHouseStoreFacade + 'a>, StoreError> {
        Ok(Box::new(PgDataStoreFacade::with_pooled_connection(
            self.pool.get()?,
        )))
    }
}

pub struct PgDataStoreFacade {
    connection: diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<PgConnection>>,
}

impl PgDataStoreFacade {
    pub fn with_pooled_connection(
        connection: diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<PgConnection>>,
    ) -> Self {
        Self { connection }
    }
}

impl OpenHouseStoreFacade for PgDataStoreFacade {
    fn create_reservation(
        &mut self,
        reservation: models::NewReservation,
    ) -> Result<models::Reservation, StoreError> {
        use schema::reservations::dsl::*;

        self.connection.transaction(|connection| {
            // Report the first conflicting field. Concurrent inserts are still caught by the
            // unique constraints below.
            let the_station = reservation.station;
            if diesel::select(exists(
                reservations
                    .filter(station.eq(the_station))
                    .filter(email.eq(&reservation.email)),
            ))
            .get_result::<bool>(connection)?
            {
                return Err(StoreError::Conflict(ConflictField::Email));
            }
            if diesel::select(exists(
                reservations
                    .filter(station.eq(the_station))
                    .filter(team_name.eq(&reservation.team_name)),
            ))
            .get_result::<bool>(connection)?
            {
                return Err(StoreError::Conflict(ConflictField::TeamName));
            }
            if diesel::select(exists(
                reservations
                    .filter(station.eq(the_station))
                    .filter(time_slot.eq(&reservation.time_slot)),
            ))
            .get_result::<bool>(connection)?
            {
                return Err(StoreError::Conflict(ConflictField::TimeSlot));
            }

            Ok(diesel::insert_into(reservations)
                .values(&reservation)
                .returning(models::Reservation::as_returning())
                .get_result::<models::Reservation>(connection)?)
        })
    }

    fn get_reservations_by_email(
        &mut self,
        the_station: Station,
        the_email: &str,
    ) -> Result<Vec<models::Reservation>, StoreError> {
        use schema::reservations::dsl::*;

        reservations
            .filter(station.eq(the_station))
            .filter(email.eq(the_email))
            .order_by((created_at.desc(), id.desc()))
            .select(models::Reservation::as_select())
            .load::<models::Reservation>(&mut self.connection)
            .map_err(|e| e.into())
    }

    fn get_reservation_with_email(
        &mut self,
        the_station: Station,
        reservation_id: ReservationId,
        the_email: &str,
    ) -> Result<models::Reservation, StoreError> {
        use schema::reservations::dsl::*;

        reservations
            .filter(id.eq(reservation_id))
            .filter(station.eq(the_station))
            .filter(email.eq(the_email))
            .select(models::Reservation::as_select())
            .first::<models::Reservation>(&mut self.connection)
            .map_err(|e| e.into())
    }

    fn change_time_slot(
        &mut self,
        the_station: Station,
        reservation_id: ReservationId,
        new_time_slot: &str,
    ) -> Result<models::TimeSlotChange, StoreError> {
        use schema::reservations::dsl::*;

        self.connection.transaction(|connection| {
            let is_taken = diesel::select(exists(
                reservations
                    .filter(station.eq(the_station))
                    .filter(time_slot.eq(new_time_slot))
                    .filter(id.ne(reservation_id)),
            ))
            .get_result::<bool>(connection)?;
            if is_taken {
                return Err(StoreError::Conflict(ConflictField::TimeSlot));
            }

            let reservation = reservations
                .filter(id.eq(reservation_id))
                .filter(station.eq(the_station))
                .select(models::Reservation::as_select())
                .first::<models::Reservation>(connection)?;

            diesel::update(reservations)
                .filter(id.eq(reservation_id))
                .set((
                    time_slot.eq(new_time_slot),
                    updated_at.eq(diesel::dsl::now),
                ))
                .execute(connection)?;

            Ok(models::TimeSlotChange {
                id: reservation.id,
                old_time_slot: reservation.time_slot,
                new_time_slot: new_time_slot.to_owned(),
                team_name: reservation.team_name,
                email: reservation.email,
            })
        })
    }

    fn delete_reservation(
        &mut self,
        the_station: Station,
        reservation_id: ReservationId,
        the_email: &str,
    ) -> Result<models::Reservation, StoreError> {
        use schema::reservations::dsl::*;

        diesel::delete(reservations)
            .filter(id.eq(reservation_id))
            .filter(station.eq(the_station))
            .filter(email.eq(the_email))
            .returning(models::Reservation::as_returning())
            .get_result::<models::Reservation>(&mut self.connection)
            .map_err(|e| e.into())
    }

    fn get_taken_time_slots(&mut self, the_station: Station) -> Result<Vec<String>, StoreError> {
        use schema::reservations::dsl::*;

        reservations
            .filter(station.eq(the_station))
            .select(time_slot)
            .order_by(time_slot)
            .load::<String>(&mut self.connection)
            .map_err(|e| e.into())
    }

    fn record_scan(&mut self, scan: models::NewScan) -> Result<bool, StoreError> {
        use schema::scans::dsl::*;

        let inserted_rows = diesel::insert_into(scans)
            .values(&scan)
            .on_conflict_do_nothing()
            .execute(&mut self.connection)?;
        Ok(inserted_rows == 1)
    }

    fn get_reservations_filtered(
        &mut self,
        _auth_token: &AdminToken,
        filter: ReservationFilter,
    ) -> Result<Vec<models::Reservation>, StoreError> {
        use schema::reservations::dsl::*;

        let mut query = reservations
            .select(models::Reservation::as_select())
            .order_by((created_at.desc(), id.desc()))
            .into_boxed();
        if let Some(the_station) = filter.station {
            query = query.filter(station.eq(the_station));
        }
        if let Some(the_time_slot) = filter.time_slot {
            query = query.filter(time_slot.eq(the_time_slot));
        }
        if let Some(search) = filter.search {
            let pattern = format!("%{}%", escape_like_pattern(&search));
            query = query.filter(team_name.ilike(pattern.clone()).or(email.ilike(pattern)));
        }
        query
            .load::<models::Reservation>(&mut self.connection)
            .map_err(|e| e.into())
    }

    fn get_reservation_counts(
        &mut self,
        _auth_token: &AdminToken,
    ) -> Result<Vec<models::StationCounts>, StoreError> {
        use diesel::dsl::{count, count_star};
        use diesel::expression_methods::AggregateExpressionMethods;
        use schema::reservations::dsl::*;

        reservations
            .group_by(station)
            .select((station, count_star(), count(time_slot).aggregate_distinct()))
            .order_by(station)
            .load::<models::StationCounts>(&mut self.connection)
            .map_err(|e| e.into())
    }

    fn get_scans(
        &mut self,
        _auth_token: &AdminToken,
        the_station: Option<Station>,
    ) -> Result<Vec<models::Scan>, StoreError> {
        use schema::scans::dsl::*;

        let mut query = scans
            .select(models::Scan::as_select())
            .order_by((scanned_at.desc(), id.desc()))
            .into_boxed();
        if let Some(the_station) = the_station {
            query = query.filter(station.eq(the_station));
        }
        query
            .load::<models::Scan>(&mut self.connection)
            .map_err(|e| e.into())
    }

    fn authenticate_admin(
        &mut self,
        the_email: &str,
        the_password: &str,
        session_token: &mut SessionToken,
    ) -> Result<(), StoreError> {
        use schema::admins::dsl::*;

        let admin = admins
            .filter(email.eq(the_email.trim().to_lowercase()))
            .select(models::Admin::as_select())
            .first::<models::Admin>(&mut self.connection)
            .optional()?;
        match admin {
            Some(admin) if password::verify_password(the_password, &admin.password_hash) => {
                session_token.set_admin(admin.id);
                Ok(())
            }
            _ => Err(StoreError::NotExisting),
        }
    }

    fn get_admin_token_for_session(
        &mut self,
        session_token: &SessionToken,
    ) -> Result<AdminToken, StoreError> {
        use schema::admins::dsl::*;

        let admin_id = session_token
            .admin_id()
            .ok_or(StoreError::PermissionDenied)?;
        let admin_email = admins
            .filter(id.eq(admin_id))
            .select(email)
            .first::<String>(&mut self.connection)
            .optional()?
            .ok_or(StoreError::PermissionDenied)?;
        Ok(AdminToken::create_for_session(admin_id, admin_email))
    }

    fn get_admins(&mut self, _auth_token: &AdminToken) -> Result<Vec<models::Admin>, StoreError> {
        use schema::admins::dsl::*;

        admins
            .select(models::Admin::as_select())
            .order_by(id)
            .load::<models::Admin>(&mut self.connection)
            .map_err(|e| e.into())
    }

    fn create_admin(
        &mut self,
        _auth_token: &AdminToken,
        admin: models::NewAdmin,
    ) -> Result<AdminId, StoreError> {
        use schema::admins::dsl::*;

        Ok(diesel::insert_into(admins)
            .values(&admin)
            .returning(id)
            .get_result::<AdminId>(&mut self.connection)?)
    }

    fn delete_admin(
        &mut self,
        _auth_token: &AdminToken,
        admin_id: AdminId,
    ) -> Result<(), StoreError> {
        use schema::admins::dsl::*;

        let affected_rows = diesel::delete(admins)
            .filter(id.eq(admin_id))
            .execute(&mut self.connection)?;
        if affected_rows > 0 {
            Ok(())
        } else {
            Err(StoreError::NotExisting)
        }
    }
}

/// Escape the LIKE wildcard characters in a user-provided search string
fn escape_like_pattern(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

/// Get the reservation field which is guarded by a specific unique constraint in our Postgres
/// database schema by the constraint's name.
pub fn conflict_field_for_postgres_constraint(constraint_name: &str) -> Option<ConflictField> {
    match constraint_name {
        "reservations_station_email_key" => Some(ConflictField::Email),
        "reservations_station_team_name_key" => Some(ConflictField::TeamName),
        "reservations_station_time_slot_key" => Some(ConflictField::TimeSlot),
        _ => None,
    }
}

/// Get a human-readable description of the consistency expectation that is checked by a specific
/// constraint in our Postgres database schema by the constraint's name.
///
/// Returns None, when no human-readable description is present of the given constraint name. This
/// may be the case when we don't expect this constraint to be violated by a user interaction.
pub fn description_for_postgres_constraint(constraint_name: &str) -> Option<&'static str> {
    match constraint_name {
        "reservations_station_check" => Some("Reservation's station must be 1 or 2."),
        "reservations_team_number_check" => Some("Participant count must be between 1 and 8"),
        "scans_station_check" => Some("Scanned table must be 1 or 2."),
        _ => None,
    }
}
