use super::error::QueryError;
use super::types::{OrderInfo, SortDirection};

pub struct QueryOrder;

impl QueryOrder {
    /// Parse `"created_at desc, name"` into order entries. Direction defaults to ascending.
    pub fn parse(s: &str) -> Result<Vec<OrderInfo>, QueryError> {
        let mut out = Vec::new();
        for part in s.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() { continue; }
            let mut it = trimmed.split_whitespace();
            if let Some(col) = it.next() {
                let sort = match it.next() {
                    None => SortDirection::Asc,
                    Some(dir) if dir.eq_ignore_ascii_case("asc") => SortDirection::Asc,
                    Some(dir) if dir.eq_ignore_ascii_case("desc") => SortDirection::Desc,
                    Some(dir) => return Err(QueryError::InvalidDirection(dir.to_string())),
                };
                out.push(OrderInfo { column: col.to_string(), sort });
            }
        }
        Ok(out)
    }

    /// Render as the `order` parameter value, e.g. `full_name.asc,id.desc`
    pub fn generate(infos: &[OrderInfo]) -> String {
        infos
            .iter()
            .map(|i| format!("{}.{}", i.column, i.sort.as_param()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_directions() {
        let infos = QueryOrder::parse("created_at desc, name").unwrap();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].column, "created_at");
        assert_eq!(infos[0].sort, SortDirection::Desc);
        assert_eq!(infos[1].sort, SortDirection::Asc);
        assert_eq!(QueryOrder::generate(&infos), "created_at.desc,name.asc");
    }

    #[test]
    fn rejects_unknown_direction() {
        let err = QueryOrder::parse("name sideways").unwrap_err();
        assert_eq!(err, QueryError::InvalidDirection("sideways".to_string()));
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(QueryOrder::parse(" , ").unwrap().is_empty());
        assert_eq!(QueryOrder::generate(&[]), "");
    }
}
