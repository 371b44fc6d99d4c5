use crate::schema::kv_store;

use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = kv_store)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KvEntryRow {
  pub namespace: String,
  pub payload: String,
  pub updated_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = kv_store)]
pub struct NewKvEntry<'a> {
  pub namespace: &'a str,
  pub payload: &'a str,
}
