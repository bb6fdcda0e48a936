//! Flashcard CRUD for the web variant. All queries are scoped to one user.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Result, Row};

use crate::domain::Flashcard;

fn row_to_flashcard(row: &Row) -> Result<Flashcard> {
  let last_review: Option<String> = row.get(3)?;
  Ok(Flashcard {
    id: row.get(0)?,
    question: row.get(1)?,
    answer: row.get(2)?,
    last_review_date: last_review.and_then(|s| s.parse::<NaiveDate>().ok()),
    review_count: row.get(4)?,
  })
}

/// Insert a card. No validation of emptiness or duplicates: any non-error
/// input is accepted.
pub fn insert_flashcard(
  conn: &Connection,
  user_id: i64,
  question: &str,
  answer: &str,
) -> Result<i64> {
  conn.execute(
    r#"
    INSERT INTO flashcards (user_id, question, answer, review_count, created_at)
    VALUES (?1, ?2, ?3, 0, ?4)
    "#,
    params![user_id, question, answer, Utc::now().to_rfc3339()],
  )?;
  Ok(conn.last_insert_rowid())
}

/// All of a user's cards in storage order.
pub fn get_flashcards(conn: &Connection, user_id: i64) -> Result<Vec<Flashcard>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, question, answer, last_review_date, review_count
    FROM flashcards WHERE user_id = ?1
    "#,
  )?;
  stmt
    .query_map(params![user_id], row_to_flashcard)?
    .collect()
}

pub fn get_flashcard_by_id(
  conn: &Connection,
  user_id: i64,
  card_id: i64,
) -> Result<Option<Flashcard>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, question, answer, last_review_date, review_count
    FROM flashcards WHERE user_id = ?1 AND id = ?2
    "#,
  )?;
  let mut rows = stmt.query(params![user_id, card_id])?;
  if let Some(row) = rows.next()? {
    Ok(Some(row_to_flashcard(row)?))
  } else {
    Ok(None)
  }
}

/// Bump review metadata after a card was answered in review mode.
pub fn mark_reviewed(conn: &Connection, card_id: i64) -> Result<()> {
  let today = Utc::now().date_naive().to_string();
  conn.execute(
    r#"
    UPDATE flashcards
    SET review_count = review_count + 1, last_review_date = ?1
    WHERE id = ?2
    "#,
    params![today, card_id],
  )?;
  Ok(())
}

pub fn count_flashcards(conn: &Connection, user_id: i64) -> Result<i64> {
  conn.query_row(
    "SELECT COUNT(*) FROM flashcards WHERE user_id = ?1",
    params![user_id],
    |row| row.get(0),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::TestEnv;

  #[test]
  fn test_insert_and_list_in_storage_order() {
    let env = TestEnv::new().unwrap();
    let user = env.create_user("alice");

    insert_flashcard(&env.conn, user, "q1", "a1").unwrap();
    insert_flashcard(&env.conn, user, "q2", "a2").unwrap();

    let cards = get_flashcards(&env.conn, user).unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].question, "q1");
    assert_eq!(cards[1].question, "q2");
  }

  #[test]
  fn test_cards_are_scoped_to_their_user() {
    let env = TestEnv::new().unwrap();
    let alice = env.create_user("alice");
    let bob = env.create_user("bob");

    insert_flashcard(&env.conn, alice, "q", "a").unwrap();

    assert_eq!(count_flashcards(&env.conn, alice).unwrap(), 1);
    assert_eq!(count_flashcards(&env.conn, bob).unwrap(), 0);
    let card_id = get_flashcards(&env.conn, alice).unwrap()[0].id;
    assert!(get_flashcard_by_id(&env.conn, bob, card_id).unwrap().is_none());
  }

  #[test]
  fn test_empty_input_is_accepted() {
    let env = TestEnv::new().unwrap();
    let user = env.create_user("alice");
    insert_flashcard(&env.conn, user, "", "").unwrap();
    assert_eq!(count_flashcards(&env.conn, user).unwrap(), 1);
  }

  #[test]
  fn test_unreadable_row_is_an_error_not_a_skip() {
    let env = TestEnv::new().unwrap();
    let user = env.create_user("alice");
    insert_flashcard(&env.conn, user, "good", "row").unwrap();
    // A negative review_count cannot map into the u32 field
    env
      .conn
      .execute(
        "INSERT INTO flashcards (user_id, question, answer, review_count, created_at)
         VALUES (?1, 'bad', 'row', -1, '')",
        params![user],
      )
      .unwrap();

    assert!(get_flashcards(&env.conn, user).is_err());
  }

  #[test]
  fn test_mark_reviewed_bumps_count_and_date() {
    let env = TestEnv::new().unwrap();
    let user = env.create_user("alice");
    let id = insert_flashcard(&env.conn, user, "q", "a").unwrap();

    mark_reviewed(&env.conn, id).unwrap();
    mark_reviewed(&env.conn, id).unwrap();

    let card = get_flashcard_by_id(&env.conn, user, id).unwrap().unwrap();
    assert_eq!(card.review_count, 2);
    assert!(card.last_review_date.is_some());
  }
}
