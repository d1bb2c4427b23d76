use diesel::{AsExpression, FromSqlRow};
use openhouse_api_types::StationNumber;
use std::fmt::{Display, Formatter};

/// One of the two physical stations ("tables") of the event. Each station is an independent
/// booking space with its own slot catalog.
///
/// Stored in the database and transferred via the API as its number (`1` or `2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsExpression, FromSqlRow)]
#[diesel(sql_type = diesel::sql_types::SmallInt)]
#[repr(i16)]
pub enum Station {
    One = 1,
    Two = 2,
}

impl Station {
    pub const ALL: [Station; 2] = [Station::One, Station::Two];

    pub fn number(self) -> StationNumber {
        self as StationNumber
    }
}

impl Display for Station {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "station {}", self.number())
    }
}

#[derive(Debug, PartialEq)]
pub struct UnknownStationError(pub StationNumber);

impl Display for UnknownStationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is not a valid station number (expected 1 or 2)", self.0)
    }
}

impl std::error::Error for UnknownStationError {}

impl TryFrom<StationNumber> for Station {
    type Error = UnknownStationError;

    fn try_from(value: StationNumber) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Station::One),
            2 => Ok(Station::Two),
            value => Err(UnknownStationError(value)),
        }
    }
}

impl From<Station> for StationNumber {
    fn from(value: Station) -> Self {
        value.number()
    }
}
