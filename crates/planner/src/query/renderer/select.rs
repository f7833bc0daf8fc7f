use crate::query::{
    ast::{
        common::{Projection, TableRef},
        select::{CountRows, Select},
    },
    renderer::{Render, Renderer},
};

impl Render for Select {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("SELECT ");
        self.projection.render(r);

        r.sql.push_str(" FROM ");
        self.from.render(r);

        if let Some(limit) = self.limit {
            r.sql.push_str(&format!(" LIMIT {limit}"));
        }
    }
}

impl Render for CountRows {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("SELECT COUNT(*) FROM ");
        self.from.render(r);
    }
}

impl Render for Projection {
    fn render(&self, r: &mut Renderer) {
        match self {
            Projection::All => r.sql.push('*'),
            Projection::Columns(columns) => {
                for (i, col) in columns.iter().enumerate() {
                    if i > 0 {
                        r.sql.push_str(", ");
                    }
                    r.push_identifier(col.as_str());
                }
            }
        }
    }
}

impl Render for TableRef {
    fn render(&self, r: &mut Renderer) {
        if let Some(schema) = &self.schema {
            r.push_identifier(schema.as_str());
            r.sql.push('.');
        }
        r.push_identifier(self.name.as_str());
    }
}

#[cfg(test)]
mod tests {
    use crate::query::{
        ast::{
            common::{Projection, TableRef},
            select::{CountRows, Select},
        },
        dialect::{MySql, Postgres},
        renderer::to_sql,
    };

    #[test]
    fn test_render_select_all() {
        let select = Select::new(TableRef::parse("users").unwrap(), Projection::All);
        assert_eq!(to_sql(&select, &MySql), "SELECT * FROM `users`");
        assert_eq!(to_sql(&select, &Postgres), r#"SELECT * FROM "users""#);
    }

    #[test]
    fn test_render_select_columns_with_limit() {
        let select = Select::new(
            TableRef::parse("public.events").unwrap(),
            Projection::columns(["id", "kind"]).unwrap(),
        )
        .limit(Some(2000));

        assert_eq!(
            to_sql(&select, &Postgres),
            r#"SELECT "id", "kind" FROM "public"."events" LIMIT 2000"#
        );
    }

    #[test]
    fn test_render_count() {
        let count = CountRows {
            from: TableRef::parse("users").unwrap(),
        };
        assert_eq!(to_sql(&count, &MySql), "SELECT COUNT(*) FROM `users`");
    }

    #[test]
    fn test_hostile_names_stay_inside_quotes() {
        let select = Select::new(
            TableRef::parse("users`; DROP TABLE users; --").unwrap(),
            Projection::columns(["id"]).unwrap(),
        );
        assert_eq!(
            to_sql(&select, &MySql),
            "SELECT `id` FROM `users``; DROP TABLE users; --`"
        );
    }
}
