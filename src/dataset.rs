use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// A VAT rate in percent. Always finite and non-negative.
/// Whole rates serialize as JSON integers (`19`), the rest as decimals (`5.5`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Rate(f64);

impl Rate {
    /// Returns `None` for negative or non-finite values.
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value >= 0.0).then_some(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Serialize for Rate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract() == 0.0 && self.0 < u64::MAX as f64 {
            serializer.serialize_u64(self.0 as u64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRecord {
    pub code: &'static str,
    pub name: String,
    pub rate: Rate,
}

impl CountryRecord {
    /// The code as used in file names and redirect paths.
    pub fn slug(&self) -> String {
        self.code.to_lowercase()
    }
}

/// Every record of one run, in table order, stamped with the time of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub updated_at: DateTime<Utc>,
    pub records: Vec<CountryRecord>,
}

impl Dataset {
    pub fn new(updated_at: DateTime<Utc>, records: Vec<CountryRecord>) -> Self {
        Self {
            updated_at,
            records,
        }
    }

    /// The `all.json` document.
    pub fn all(&self) -> Stamped<'_, [CountryRecord]> {
        Stamped {
            updated_at: self.updated_at,
            data: &self.records,
        }
    }

    /// One `<code>.json` document per record, in table order.
    pub fn per_country(&self) -> impl Iterator<Item = Stamped<'_, CountryRecord>> + '_ {
        self.records.iter().map(|record| Stamped {
            updated_at: self.updated_at,
            data: record,
        })
    }

    /// The static `prefix` followed by one rewrite rule per record, joined with `\n`.
    pub fn redirects(&self, prefix: &str) -> String {
        std::iter::once(prefix.to_owned())
            .chain(self.records.iter().map(redirect_line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `{ "updatedAt": ..., "data": ... }` envelope shared by every JSON file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamped<'a, T: ?Sized> {
    #[serde(serialize_with = "serialize_iso")]
    pub updated_at: DateTime<Utc>,
    pub data: &'a T,
}

pub fn redirect_line(record: &CountryRecord) -> String {
    let slug = record.slug();
    format!("/api/{slug}    /api/{slug}.json 200!")
}

fn serialize_iso<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Millis, true))
}
