//! Checklist CSV export.
//!
//! Every cell is quoted with embedded quotes doubled, options are joined with `; `,
//! and rows end with CRLF.

use crate::modules::checklist::schema::ChecklistFieldEntity;

const HEADER: [&str; 5] = ["Position", "Label", "Type", "Required", "Options"];

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

fn push_row<'a>(out: &mut String, cells: impl IntoIterator<Item = &'a str>) {
    let row: Vec<String> = cells.into_iter().map(quote).collect();
    out.push_str(&row.join(","));
    out.push_str("\r\n");
}

pub fn fields_to_csv(fields: &[ChecklistFieldEntity]) -> String {
    let mut out = String::new();
    push_row(&mut out, HEADER);

    let mut sorted: Vec<&ChecklistFieldEntity> = fields.iter().collect();
    sorted.sort_by_key(|f| f.position);

    for field in sorted {
        let position = (field.position + 1).to_string();
        let required = if field.required { "Yes" } else { "No" };
        let options = field.options.join("; ");
        let row = [
            position.as_str(),
            field.label.as_str(),
            field.field_type.as_str(),
            required,
            options.as_str(),
        ];
        push_row(&mut out, row);
    }
    out
}

/// File name for the download, restricted to characters safe in a header value.
pub fn export_file_name(template_name: &str) -> String {
    let stem: String = template_name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('_');
    if stem.is_empty() { "checklist.csv".to_string() } else { format!("{stem}.csv") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::checklist::schema::FieldType;
    use uuid::Uuid;

    fn field(
        position: i32,
        label: &str,
        field_type: FieldType,
        options: &[&str],
    ) -> ChecklistFieldEntity {
        ChecklistFieldEntity {
            id: Uuid::now_v7(),
            template_id: Uuid::nil(),
            label: label.to_string(),
            field_type,
            required: position == 0,
            options: options.iter().map(|o| o.to_string()).collect(),
            position,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn header_only_for_empty_template() {
        let header = "\"Position\",\"Label\",\"Type\",\"Required\",\"Options\"\r\n";
        assert_eq!(fields_to_csv(&[]), header);
    }

    #[test]
    fn rows_are_quoted_and_ordered_by_position() {
        let fields = vec![
            field(1, "Exit \"A\" clear", FieldType::Select, &["Yes", "No", "N/A"]),
            field(0, "Fire extinguisher, charged", FieldType::Checkbox, &[]),
        ];
        let csv = fields_to_csv(&fields);
        let lines: Vec<&str> = csv.split("\r\n").collect();

        assert_eq!(lines[1], "\"1\",\"Fire extinguisher, charged\",\"checkbox\",\"Yes\",\"\"");
        assert_eq!(lines[2], "\"2\",\"Exit \"\"A\"\" clear\",\"select\",\"No\",\"Yes; No; N/A\"");
        assert_eq!(lines[3], "");
        assert!(csv.ends_with("\r\n"));
    }

    #[test]
    fn file_name_is_sanitized() {
        assert_eq!(export_file_name("Site Walk: Q3"), "Site_Walk__Q3.csv");
        assert_eq!(export_file_name("  "), "checklist.csv");
    }
}
