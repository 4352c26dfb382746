//! Record table state with single-row inline editing.

use tracing::error;

use crate::record::{FieldName, UserChanges, UserDraft, UserRecord};
use crate::schema::USER_FIELDS;
use crate::service::{ApiError, UsersApi};
use crate::store::UserStore;

pub const EMPTY_PLACEHOLDER: &str = "No users found.";
pub const ACTIONS_HEADER: &str = "Actions";

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: String,
    pub cells: Vec<String>,
    /// Whether the cells show the working copy as editable inputs.
    pub editing: bool,
}

/// Headers plus either rows or the empty placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<&'static str>,
    pub rows: Vec<RowView>,
    pub placeholder: Option<&'static str>,
}

impl TableView {
    /// Render as aligned plain-text lines, one per row after the header.
    ///
    /// The row being edited is marked with `*` in the actions column.
    ///
    /// # Examples
    /// ```
    /// use records_client::table::UserTable;
    ///
    /// let text = UserTable::default().view(&[]).render_text();
    /// assert!(text.ends_with("No users found.\n"));
    /// ```
    pub fn render_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|header| header.len()).collect();
        let actions = |row: &RowView| {
            let marker = if row.editing { "*" } else { "" };
            format!("{}{marker}", row.id)
        };
        for row in &self.rows {
            let cells = row.cells.iter().cloned().chain([actions(row)]);
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let format_line = |cells: Vec<String>| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_owned()
        };
        let mut lines = vec![format_line(
            self.headers.iter().map(|header| (*header).to_owned()).collect(),
        )];
        lines.extend(
            self.rows
                .iter()
                .map(|row| format_line(row.cells.iter().cloned().chain([actions(row)]).collect())),
        );
        lines.extend(self.placeholder.map(str::to_owned));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Inline editing state: at most one row is edited at a time.
#[derive(Debug, Default)]
pub struct UserTable {
    editing_id: Option<String>,
    working_copy: UserDraft,
}

impl UserTable {
    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn working_copy(&self) -> &UserDraft {
        &self.working_copy
    }

    /// Begin editing `record`, replacing any edit in progress.
    pub fn start_edit(&mut self, record: &UserRecord) {
        self.editing_id = Some(record.id.clone());
        self.working_copy = UserDraft::from(record);
    }

    /// Update the working copy; ignored when no row is being edited.
    pub fn change(&mut self, field: FieldName, value: impl Into<String>) {
        if self.editing_id.is_some() {
            self.working_copy.set(field, value);
        }
    }

    /// Send the whole working copy as an update.
    ///
    /// Editing ends on success. On failure the row stays in edit mode and
    /// the store carries the message. Saving with no row in edit mode does
    /// nothing.
    pub async fn save<A: UsersApi>(&mut self, store: &mut UserStore<A>) {
        let Some(id) = self.editing_id.clone() else {
            return;
        };
        let changes = UserChanges::from(self.working_copy.clone());
        match store.update(&id, &changes).await {
            Ok(()) => self.cancel(),
            Err(err) => error!(error = %err, user_id = %id, "failed to update user"),
        }
    }

    /// Leave edit mode without contacting the server.
    pub fn cancel(&mut self) {
        self.editing_id = None;
        self.working_copy = UserDraft::default();
    }

    /// Delete a row through the store.
    ///
    /// # Errors
    ///
    /// Returns the service error; the store already carries its message.
    pub async fn delete<A: UsersApi>(
        &mut self,
        store: &mut UserStore<A>,
        id: &str,
    ) -> Result<(), ApiError> {
        store.delete(id).await?;
        if self.editing_id.as_deref() == Some(id) {
            self.cancel();
        }
        Ok(())
    }

    /// Build the view for `records`.
    pub fn view(&self, records: &[UserRecord]) -> TableView {
        let headers = USER_FIELDS
            .iter()
            .map(|field| field.label)
            .chain([ACTIONS_HEADER])
            .collect();
        let rows: Vec<RowView> = records
            .iter()
            .map(|record| {
                let editing = self.editing_id.as_deref() == Some(record.id.as_str());
                let cells = USER_FIELDS
                    .iter()
                    .map(|field| {
                        if editing {
                            self.working_copy.get(field.name).to_owned()
                        } else {
                            record.field(field.name).to_owned()
                        }
                    })
                    .collect();
                RowView {
                    id: record.id.clone(),
                    cells,
                    editing,
                }
            })
            .collect();
        let placeholder = rows.is_empty().then_some(EMPTY_PLACEHOLDER);
        TableView {
            headers,
            rows,
            placeholder,
        }
    }
}
