//! Algorithm tests for the recommendation engine


use bookshelf_core::models::{Book, RatingRecord};
use chrono::{TimeZone, Utc};

pub(crate) fn book(id: &str, title: &str, author: &str) -> Book {
    Book {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        publisher: String::new(),
        year: String::new(),
        image_url: String::new(),
    }
}

pub(crate) fn rating(title: &str, stars: i32) -> RatingRecord {
    RatingRecord {
        user_id: "reader-1".to_string(),
        book_id: format!("id-{title}"),
        book_title: title.to_string(),
        rating: stars,
        review: String::new(),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}
