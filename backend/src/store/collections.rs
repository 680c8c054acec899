// backend/src/store/collections.rs
use super::{json_column, to_json, Store};
use crate::error::ServiceError;
use common::model::collection::{CaseStudy, Collection};
use common::model::template::Template;
use rusqlite::{params, OptionalExtension, Row};

fn collection_from_row(row: &Row) -> rusqlite::Result<Collection> {
    Ok(Collection {
        id: row.get(0)?,
        name: row.get(1)?,
        tags: json_column(row, 2)?,
        placeholders: json_column(row, 3)?,
        template_ids: json_column(row, 4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn case_study_from_row(row: &Row) -> rusqlite::Result<CaseStudy> {
    Ok(CaseStudy {
        id: row.get(0)?,
        tags: json_column(row, 1)?,
        template_ids: json_column(row, 2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

impl Store {
    pub fn insert_collection(&self, collection: &Collection) -> Result<(), ServiceError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO collections (id, name, tags, placeholders, template_ids, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                collection.id,
                collection.name,
                to_json(&collection.tags)?,
                to_json(&collection.placeholders)?,
                to_json(&collection.template_ids)?,
                collection.created_at,
                collection.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_collection(&self, id: &str) -> Result<Option<Collection>, ServiceError> {
        let conn = self.connection()?;
        let collection = conn
            .query_row(
                "SELECT id, name, tags, placeholders, template_ids, created_at, updated_at \
                 FROM collections WHERE id = ?1",
                params![id],
                collection_from_row,
            )
            .optional()?;
        Ok(collection)
    }

    pub fn list_collections(&self) -> Result<Vec<Collection>, ServiceError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, tags, placeholders, template_ids, created_at, updated_at \
             FROM collections ORDER BY created_at DESC",
        )?;
        let collections = stmt
            .query_map([], collection_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(collections)
    }

    pub fn update_collection(&self, collection: &Collection) -> Result<bool, ServiceError> {
        let conn = self.connection()?;
        let changed = conn.execute(
            "UPDATE collections SET name = ?2, tags = ?3, placeholders = ?4, template_ids = ?5, \
             updated_at = ?6 WHERE id = ?1",
            params![
                collection.id,
                collection.name,
                to_json(&collection.tags)?,
                to_json(&collection.placeholders)?,
                to_json(&collection.template_ids)?,
                collection.updated_at,
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_collection(&self, id: &str) -> Result<bool, ServiceError> {
        let conn = self.connection()?;
        let changed = conn.execute("DELETE FROM collections WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// Templates of a collection, `None` when the collection does not exist.
    pub fn collection_templates(&self, id: &str) -> Result<Option<Vec<Template>>, ServiceError> {
        match self.get_collection(id)? {
            Some(collection) => Ok(Some(self.templates_by_ids(&collection.template_ids)?)),
            None => Ok(None),
        }
    }

    pub fn insert_case_study(&self, case_study: &CaseStudy) -> Result<(), ServiceError> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO case_studies (id, tags, template_ids, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                case_study.id,
                to_json(&case_study.tags)?,
                to_json(&case_study.template_ids)?,
                case_study.created_at,
                case_study.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_case_study(&self, id: &str) -> Result<Option<CaseStudy>, ServiceError> {
        let conn = self.connection()?;
        let case_study = conn
            .query_row(
                "SELECT id, tags, template_ids, created_at, updated_at FROM case_studies WHERE id = ?1",
                params![id],
                case_study_from_row,
            )
            .optional()?;
        Ok(case_study)
    }

    pub fn list_case_studies(&self) -> Result<Vec<CaseStudy>, ServiceError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, tags, template_ids, created_at, updated_at FROM case_studies \
             ORDER BY created_at DESC",
        )?;
        let case_studies = stmt
            .query_map([], case_study_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(case_studies)
    }

    pub fn update_case_study(&self, case_study: &CaseStudy) -> Result<bool, ServiceError> {
        let conn = self.connection()?;
        let changed = conn.execute(
            "UPDATE case_studies SET tags = ?2, template_ids = ?3, updated_at = ?4 WHERE id = ?1",
            params![
                case_study.id,
                to_json(&case_study.tags)?,
                to_json(&case_study.template_ids)?,
                case_study.updated_at,
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_case_study(&self, id: &str) -> Result<bool, ServiceError> {
        let conn = self.connection()?;
        let changed = conn.execute("DELETE FROM case_studies WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    pub fn case_study_templates(&self, id: &str) -> Result<Option<Vec<Template>>, ServiceError> {
        match self.get_case_study(id)? {
            Some(case_study) => Ok(Some(self.templates_by_ids(&case_study.template_ids)?)),
            None => Ok(None),
        }
    }
}
