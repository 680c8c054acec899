// backend/src/store/templates.rs
use super::{json_column, to_json, Store};
use crate::error::ServiceError;
use common::model::template::Template;
use common::model::template_type::TemplateType;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

const COLUMNS: &str = "id, name, type, html_ref, html_url, version, is_latest, is_visible, \
     production, published_at, created_by, tags, json_data, placeholders, collection_id, \
     parent_id, child_ids, created_at, updated_at";

fn template_from_row(row: &Row) -> rusqlite::Result<Template> {
    let type_name: String = row.get(2)?;
    let template_type: TemplateType = type_name
        .parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, e.into()))?;

    Ok(Template {
        id: row.get(0)?,
        name: row.get(1)?,
        template_type,
        html_ref: row.get(3)?,
        html_url: row.get(4)?,
        version: row.get(5)?,
        is_latest: row.get(6)?,
        is_visible: row.get(7)?,
        production: row.get(8)?,
        published_at: row.get(9)?,
        created_by: row.get(10)?,
        tags: json_column(row, 11)?,
        json_data: json_column(row, 12)?,
        placeholders: json_column(row, 13)?,
        collection_id: row.get(14)?,
        parent_id: row.get(15)?,
        child_ids: json_column(row, 16)?,
        created_at: row.get(17)?,
        updated_at: row.get(18)?,
    })
}

impl Store {
    pub fn insert_template(&self, template: &Template) -> Result<(), ServiceError> {
        let conn = self.connection()?;
        conn.execute(
            &format!(
                "INSERT INTO templates ({}) VALUES \
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
                COLUMNS
            ),
            params![
                template.id,
                template.name,
                template.template_type.as_str(),
                template.html_ref,
                template.html_url,
                template.version,
                template.is_latest,
                template.is_visible,
                template.production,
                template.published_at,
                template.created_by,
                to_json(&template.tags)?,
                to_json(&template.json_data)?,
                to_json(&template.placeholders)?,
                template.collection_id,
                template.parent_id,
                to_json(&template.child_ids)?,
                template.created_at,
                template.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_template(&self, id: &str) -> Result<Option<Template>, ServiceError> {
        let conn = self.connection()?;
        let template = conn
            .query_row(
                &format!("SELECT {} FROM templates WHERE id = ?1", COLUMNS),
                params![id],
                template_from_row,
            )
            .optional()?;
        Ok(template)
    }

    /// All templates, newest first.
    pub fn list_templates(&self) -> Result<Vec<Template>, ServiceError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM templates ORDER BY created_at DESC",
            COLUMNS
        ))?;
        let templates = stmt
            .query_map([], template_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(templates)
    }

    pub fn list_templates_by_type(&self, template_type: TemplateType) -> Result<Vec<Template>, ServiceError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM templates WHERE type = ?1 ORDER BY created_at DESC",
            COLUMNS
        ))?;
        let templates = stmt
            .query_map(params![template_type.as_str()], template_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(templates)
    }

    /// Existing templates among `ids`, in the given order.
    pub fn templates_by_ids(&self, ids: &[String]) -> Result<Vec<Template>, ServiceError> {
        let mut templates = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get_template(id)? {
                Some(template) => templates.push(template),
                None => log::warn!("Referenced template {} does not exist", id),
            }
        }
        Ok(templates)
    }

    /// Writes every mutable column of `template`. Returns `false` when no row
    /// has its id.
    pub fn update_template(&self, template: &Template) -> Result<bool, ServiceError> {
        let conn = self.connection()?;
        let changed = conn.execute(
            "UPDATE templates SET name = ?2, type = ?3, html_ref = ?4, html_url = ?5, version = ?6, \
             is_latest = ?7, is_visible = ?8, production = ?9, published_at = ?10, tags = ?11, \
             json_data = ?12, placeholders = ?13, collection_id = ?14, parent_id = ?15, \
             child_ids = ?16, updated_at = ?17 WHERE id = ?1",
            params![
                template.id,
                template.name,
                template.template_type.as_str(),
                template.html_ref,
                template.html_url,
                template.version,
                template.is_latest,
                template.is_visible,
                template.production,
                template.published_at,
                to_json(&template.tags)?,
                to_json(&template.json_data)?,
                to_json(&template.placeholders)?,
                template.collection_id,
                template.parent_id,
                to_json(&template.child_ids)?,
                template.updated_at,
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn set_template_visibility(&self, id: &str, is_visible: bool) -> Result<bool, ServiceError> {
        let conn = self.connection()?;
        let changed = conn.execute(
            "UPDATE templates SET is_visible = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, is_visible, chrono::Utc::now()],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_template(&self, id: &str) -> Result<bool, ServiceError> {
        let conn = self.connection()?;
        let changed = conn.execute("DELETE FROM templates WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}
