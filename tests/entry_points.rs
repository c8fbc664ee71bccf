use community_plot::{
    Arrangement, Axis, CommunityMatrix, Error, Label, MajorityTieBreak, MatrixRenderer,
    PlotConfig, PlotMode, Plotter, Result, SvgRenderer,
};
use proptest::prelude::*;

#[derive(Default)]
struct Recorder {
    seen: Vec<Arrangement>,
}

impl MatrixRenderer for Recorder {
    fn render(&mut self, arrangement: &Arrangement) -> Result<()> {
        self.seen.push(arrangement.clone());
        Ok(())
    }
}

fn names(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}{i}")).collect()
}

fn matrix(rows: &[&[Label]]) -> CommunityMatrix {
    CommunityMatrix::from_rows(rows.iter().copied()).unwrap()
}

#[test]
fn scenario_matrix_keeps_its_order() {
    let m = matrix(&[&[0, 0, 1], &[1, 1, 0], &[2, 2, 2]]);
    let (rn, cn) = (names("r", 3), names("c", 3));
    let mut plotter = Plotter::new(PlotConfig::default(), Recorder::default());

    let a = plotter.plot_com_order2(&m, &rn, &cn).unwrap();
    assert_eq!(a.row_order.as_slice(), &[0, 1, 2]);
    assert_eq!(a.col_order.as_slice(), &[0, 1, 2]);
    assert_eq!(a.colors.len(), 3);
    assert_eq!(plotter.renderer().seen, vec![a]);
}

#[test]
fn each_entry_point_renders_once() {
    let m = matrix(&[&[4, 4, 8], &[8, 8, 8], &[4, 1, 1]]);
    let (rn, cn) = (names("r", 3), names("c", 3));
    let mut recorder = Recorder::default();
    {
        let mut plotter = Plotter::new(PlotConfig::default(), &mut recorder);
        plotter.plot_com_original(&m, &rn, &cn).unwrap();
        plotter.plot_com_order1(&m, &rn, &cn, true).unwrap();
        plotter.plot_com_order1(&m, &rn, &cn, false).unwrap();
        plotter.plot_com_order2(&m, &rn, &cn).unwrap();
    }
    let modes: Vec<_> = recorder.seen.iter().map(|a| a.mode).collect();
    assert_eq!(
        modes,
        vec![
            PlotMode::Original,
            PlotMode::OrderOne(Axis::Row),
            PlotMode::OrderOne(Axis::Column),
            PlotMode::OrderBoth,
        ]
    );
    // 8 dominates: row 1 first, then row 0 (majority 4, ranked second).
    assert_eq!(recorder.seen[1].row_order.as_slice(), &[1, 0, 2]);
    assert_eq!(recorder.seen[1].row_names, vec!["r1", "r0", "r2"]);
}

#[test]
fn invalid_input_never_reaches_the_renderer() {
    let m = matrix(&[&[0, 1], &[1, 0]]);
    let mut plotter = Plotter::new(PlotConfig::default(), Recorder::default());
    let err = plotter
        .plot_com_order1(&m, &names("r", 3), &names("c", 2), true)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ShapeMismatch {
            axis: Axis::Row,
            expected: 2,
            found: 3
        }
    ));
    assert!(plotter.renderer().seen.is_empty());
}

#[test]
fn degenerate_shapes_are_rendered() {
    let mut plotter = Plotter::new(PlotConfig::default(), Recorder::default());

    let single = matrix(&[&[2, 5, 5, 2, 5]]);
    let a = plotter
        .plot_com_order2(&single, &names("r", 1), &names("c", 5))
        .unwrap();
    assert_eq!(a.row_order.as_slice(), &[0]);
    assert_eq!(a.col_order.as_slice(), &[1, 2, 4, 0, 3]);

    let column = matrix(&[&[7], &[3], &[7]]);
    let a = plotter
        .plot_com_order2(&column, &names("r", 3), &names("c", 1))
        .unwrap();
    assert_eq!(a.col_order.as_slice(), &[0]);
    assert_eq!(a.row_order.as_slice(), &[0, 2, 1]);

    let empty = CommunityMatrix::from_rows(Vec::<Vec<Label>>::new()).unwrap();
    let none: Vec<String> = Vec::new();
    let a = plotter.plot_com_order2(&empty, &none, &none).unwrap();
    assert!(a.row_order.is_empty() && a.col_order.is_empty() && a.colors.is_empty());
    assert_eq!(plotter.renderer().seen.len(), 3);
}

#[test]
fn svg_files_are_written_per_mode() {
    let dir = tempfile::tempdir().unwrap();
    let m = matrix(&[&[0, 1, 1], &[2, 2, 1]]);
    let (rn, cn) = (names("sector", 2), names("country", 3));
    for mode in [PlotMode::Original, PlotMode::OrderOne(Axis::Row), PlotMode::OrderBoth] {
        let path = dir.path().join(format!("{}.svg", mode.file_stem()));
        let mut plotter = Plotter::new(PlotConfig::default(), SvgRenderer::new(&path));
        plotter.plot(&m, &rn, &cn, mode).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("sector1") && svg.contains("country2"));
    }
}

fn arb_matrix() -> impl Strategy<Value = CommunityMatrix> {
    (1usize..10, 1usize..10).prop_flat_map(|(r, c)| {
        proptest::collection::vec(0u64..6, r * c)
            .prop_map(move |cells| CommunityMatrix::from_rows(cells.chunks(c)).unwrap())
    })
}

proptest! {
    #[test]
    fn order2_combines_two_order1_runs(m in arb_matrix(), ranked in any::<bool>()) {
        let tie_break = if ranked { MajorityTieBreak::BestRanked } else { MajorityTieBreak::LowestLabel };
        let config = PlotConfig::new().with_tie_break(tie_break);
        let (rn, cn) = (names("r", m.rows()), names("c", m.cols()));

        let rows = community_plot::arrange_order1(&m, &rn, &cn, true, &config).unwrap();
        let cols = community_plot::arrange_order1(&m, &rn, &cn, false, &config).unwrap();
        let both = community_plot::arrange_order2(&m, &rn, &cn, &config).unwrap();

        prop_assert_eq!(&rows.row_order, &both.row_order);
        prop_assert_eq!(&cols.col_order, &both.col_order);
        prop_assert!(rows.col_order.is_identity());
        prop_assert!(cols.row_order.is_identity());
    }

    #[test]
    fn original_is_always_identity(m in arb_matrix()) {
        let (rn, cn) = (names("r", m.rows()), names("c", m.cols()));
        let a = community_plot::arrange_original(&m, &rn, &cn, &PlotConfig::default()).unwrap();
        prop_assert!(a.row_order.is_identity());
        prop_assert!(a.col_order.is_identity());
        prop_assert_eq!(a.matrix, m);
    }

    #[test]
    fn cells_and_names_move_together(m in arb_matrix()) {
        let (rn, cn) = (names("r", m.rows()), names("c", m.cols()));
        let a = community_plot::arrange_order2(&m, &rn, &cn, &PlotConfig::default()).unwrap();
        prop_assert_eq!(a.colors.labels().collect::<Vec<_>>(), m.labels().into_iter().collect::<Vec<_>>());
        for (k, i) in a.row_order.iter().enumerate() {
            prop_assert_eq!(&a.row_names[k], &rn[i]);
            for (l, j) in a.col_order.iter().enumerate() {
                prop_assert_eq!(&a.col_names[l], &cn[j]);
                prop_assert_eq!(a.matrix.get(k, l), m.get(i, j));
            }
        }
    }
}
