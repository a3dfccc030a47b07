//! Parameter table rendering.

use crate::types::Field;

/// Markdown header rows for [`generate_parameter_table`] output.
pub const TABLE_HEADER: &str = "|Name|Required|Type|Description|\n|:----    |:---|:----- |-----   |\n";

/// One Markdown table row per field, in input order.
///
/// Nesting shows as the depth prefix in front of the name (`--name`).
pub fn generate_parameter_table(fields: &[Field]) -> String {
    let mut out = String::new();
    for field in fields {
        out.push('|');
        out.push_str(&field.prefix());
        out.push_str(&cell(&field.name));
        out.push('|');
        out.push_str(if field.required { "yes" } else { "no" });
        out.push('|');
        out.push_str(&cell(&field.type_name));
        out.push('|');
        out.push_str(&cell(&field.description));
        out.push_str("|\n");
    }
    out
}

fn cell(text: &str) -> String {
    text.trim()
        .replace('|', "\\|")
        .replace("\r\n", " ")
        .replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_in_input_order() {
        let fields = vec![
            Field::new("id", "Long", 0).required(true).description("primary key"),
            Field::new("tags", "List", 0),
            Field::new("name", "String", 1),
        ];
        assert_eq!(
            generate_parameter_table(&fields),
            "|id|yes|Long|primary key|\n|tags|no|List||\n|--name|no|String||\n"
        );
    }

    #[test]
    fn cells_are_escaped() {
        let fields = vec![Field::new("flag", "Boolean", 0).description("on | off\nsecond line")];
        assert_eq!(
            generate_parameter_table(&fields),
            "|flag|no|Boolean|on \\| off second line|\n"
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(generate_parameter_table(&[]), "");
    }
}
