#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetGeometry {
    pub columns: u16,
    pub rows: u16,
}

#[derive(Clone, Copy, Debug)]
pub enum LayoutPolicy {
    /// Fixed column count, rows follow the source aspect ratio.
    FixedColumns(u16),
    /// Fixed row count, columns follow the source aspect ratio.
    ScaleToHeight(u16),
}

impl LayoutPolicy {
    pub fn derive(&self, source_width: u32, source_height: u32) -> Option<TargetGeometry> {
        if source_width == 0 || source_height == 0 {
            return None;
        }

        let aspect = f64::from(source_width) / f64::from(source_height);

        match *self {
            LayoutPolicy::FixedColumns(columns) => {
                let columns = columns.max(1);
                let rows = (f64::from(columns) / aspect).round().clamp(1.0, f64::from(u16::MAX));
                Some(TargetGeometry { columns, rows: rows as u16 })
            },
            LayoutPolicy::ScaleToHeight(rows) => {
                let rows = rows.max(1);
                let columns = (f64::from(rows) * aspect).round().clamp(1.0, f64::from(u16::MAX));
                Some(TargetGeometry { columns: columns as u16, rows })
            },
        }
    }
}
