use crate::booking::Station;
use diesel::backend::Backend;
use diesel::deserialize::FromSql;
use diesel::query_builder::bind_collector::RawBytesBindCollector;
use diesel::serialize::ToSql;
use openhouse_api_types::StationNumber;

/// Stations are stored as their number (`SMALLINT`). Other values are rejected when reading, in
/// addition to the CHECK constraint of the database tables.
impl<DB> ToSql<diesel::sql_types::SmallInt, DB> for Station
where
    DB: Backend,
    StationNumber: ToSql<diesel::sql_types::SmallInt, DB>,
    for<'c> DB: Backend<BindCollector<'c> = RawBytesBindCollector<DB>>,
{
    fn to_sql<'b>(
        &'b self,
        out: &mut diesel::serialize::Output<'b, '_, DB>,
    ) -> diesel::serialize::Result {
        let value = self.number();
        <StationNumber as ToSql<diesel::sql_types::SmallInt, DB>>::to_sql(
            &value,
            &mut out.reborrow(),
        )
    }
}

impl<DB> FromSql<diesel::sql_types::SmallInt, DB> for Station
where
    DB: Backend,
    StationNumber: FromSql<diesel::sql_types::SmallInt, DB>,
{
    fn from_sql(bytes: <DB as Backend>::RawValue<'_>) -> diesel::deserialize::Result<Self> {
        let number = StationNumber::from_sql(bytes)?;
        Ok(Station::try_from(number)?)
    }
}
