use crate::refs::{ObjectReferences, RefType};
use chrono::prelude::*;
use pdf_writer::{Date, Finish, Pdf, TextStr};

/// The document information dictionary of a generated PDF
#[derive(Debug, Clone, PartialEq)]
pub struct Info {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Stamped as both the creation and modification date
    pub created: DateTime<FixedOffset>,
}

impl Default for Info {
    fn default() -> Self {
        Info {
            title: None,
            author: None,
            created: Local::now().fixed_offset(),
        }
    }
}

impl Info {
    pub fn new() -> Info {
        Info::default()
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Info {
        self.title = Some(title.into());
        self
    }

    pub fn with_author<S: Into<String>>(mut self, author: S) -> Info {
        self.author = Some(author.into());
        self
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let mut info = writer.document_info(refs.gen(RefType::Info));

        if let Some(title) = &self.title {
            info.title(TextStr(title.as_str()));
        }
        if let Some(author) = &self.author {
            info.author(TextStr(author.as_str()));
        }
        info.producer(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )));

        let date = pdf_date(&self.created);
        info.creation_date(date);
        info.modified_date(date);
        info.finish();
    }
}

fn pdf_date(at: &DateTime<FixedOffset>) -> Date {
    let offset = at.offset().local_minus_utc();
    let (hours, minutes) = (offset / 3600, (offset % 3600 / 60).abs());
    Date::new(at.year() as u16)
        .month(at.month() as u8)
        .day(at.day() as u8)
        .hour(at.hour() as u8)
        .minute(at.minute() as u8)
        .second(at.second() as u8)
        .utc_offset_hour(hours as i8)
        .utc_offset_minute(minutes as u8)
}
