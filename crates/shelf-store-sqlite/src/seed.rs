//! Sample catalogue for demo and development databases.

use chrono::NaiveDate;
use shelf_core::{author::Author, book::Book, store::LibraryStore as _};
use uuid::Uuid;

use crate::{Error, Result, SqliteStore};

struct SampleAuthor {
  id:            u128,
  first_name:    &'static str,
  last_name:     &'static str,
  date_of_birth: (i32, u32, u32),
  genre:         &'static str,
  books:         &'static [(u128, &'static str, &'static str)],
}

const SAMPLES: &[SampleAuthor] = &[
  SampleAuthor {
    id:            0x7f0a6c1e_3b4d_4e0a_9c55_1a2b3c4d5e01,
    first_name:    "George",
    last_name:     "RR Martin",
    date_of_birth: (1948, 9, 20),
    genre:         "Fantasy",
    books:         &[
      (
        0x7f0a6c1e_3b4d_4e0a_9c55_1a2b3c4d5f01,
        "A Game of Thrones",
        "The first novel in A Song of Ice and Fire.",
      ),
      (
        0x7f0a6c1e_3b4d_4e0a_9c55_1a2b3c4d5f02,
        "A Clash of Kings",
        "The second novel in A Song of Ice and Fire.",
      ),
    ],
  },
  SampleAuthor {
    id:            0x7f0a6c1e_3b4d_4e0a_9c55_1a2b3c4d5e02,
    first_name:    "Stephen",
    last_name:     "Fry",
    date_of_birth: (1957, 8, 24),
    genre:         "Various",
    books:         &[(
      0x7f0a6c1e_3b4d_4e0a_9c55_1a2b3c4d5f03,
      "Mythos",
      "The Greek myths retold.",
    )],
  },
  SampleAuthor {
    id:            0x7f0a6c1e_3b4d_4e0a_9c55_1a2b3c4d5e03,
    first_name:    "Douglas",
    last_name:     "Adams",
    date_of_birth: (1952, 3, 11),
    genre:         "Science fiction",
    books:         &[(
      0x7f0a6c1e_3b4d_4e0a_9c55_1a2b3c4d5f04,
      "The Hitchhiker's Guide to the Galaxy",
      "Don't panic.",
    )],
  },
];

impl SqliteStore {
  /// Insert the sample catalogue if the store holds no authors yet.
  ///
  /// Returns the number of authors inserted; `0` when the store was already
  /// populated.
  pub async fn seed_sample_data(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM authors", [], |r| r.get(0))?)
      })
      .await?;
    if count > 0 {
      return Ok(0);
    }

    for sample in SAMPLES {
      let (y, m, d) = sample.date_of_birth;
      let date_of_birth = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| Error::DateParse(format!("{y}-{m}-{d}")))?;
      let author_id = Uuid::from_u128(sample.id);

      self
        .save_author(Author {
          id: author_id,
          first_name: sample.first_name.to_owned(),
          last_name: sample.last_name.to_owned(),
          date_of_birth,
          genre: Some(sample.genre.to_owned()),
        })
        .await?;

      for (book_id, title, description) in sample.books {
        self
          .save_book(Book {
            id:          Uuid::from_u128(*book_id),
            author_id,
            title:       (*title).to_owned(),
            description: Some((*description).to_owned()),
          })
          .await?;
      }
    }

    tracing::info!(authors = SAMPLES.len(), "seeded sample catalogue");
    Ok(SAMPLES.len())
  }
}
