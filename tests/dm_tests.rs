#[cfg(test)]
mod dm_tests {
    use test_case::test_case;

    use dmism::*;

    #[test_case(b"123456", &[142, 164, 186, 114, 25, 5, 88, 102]; "digit pairs")]
    #[test_case(b"A", &[66, 129, 70, 138, 234, 82, 82, 95]; "single char")]
    fn test_reference_vectors(data: &[u8], exp: &[u8]) {
        let dm = DMBuilder::new(data).build().unwrap();
        assert_eq!((dm.rows(), dm.cols()), (10, 10));
        assert_eq!(dm.codewords(), exp);
    }

    #[test]
    fn test_base256_scrambling() {
        let enc = encode(&[0xC1; 6], &EncodeOptions::default()).unwrap();
        assert_eq!(enc.codewords, [231, 50, 130, 24, 173, 67, 217, 110]);
        assert_eq!(enc.segments, [Segment::new(Mode::Base256, 0, 6)]);
    }

    #[test_case(false)]
    #[test_case(true)]
    fn test_data_too_long(rect_extension: bool) {
        let data = vec![0xC1; 1559];
        let err = DMBuilder::new(&data).rect_extension(rect_extension).build().unwrap_err();
        assert!(matches!(err, DMError::DataTooLong { capacity: 1558, .. }));
    }

    #[test]
    fn test_rectangle_capacity() {
        let data = b"12".repeat(60);
        let err = DMBuilder::new(&data).shape(Shape::Rectangle).build().unwrap_err();
        assert_eq!(err, DMError::DataTooLong { required: 60, capacity: 49 });

        let dm = DMBuilder::new(&data).shape(Shape::Rectangle).rect_extension(true).build().unwrap();
        assert_eq!((dm.rows(), dm.cols()), (16, 64));
        assert!(dm.size().is_extension());
    }

    #[test]
    fn test_border_every_region() {
        let data = b"0123456789".repeat(100);
        let dm = DMBuilder::new(&data).build().unwrap();
        let size = dm.size();
        let (fh, fw) = (size.region_rows(), size.region_cols());
        assert!(size.region_count().0 > 1 && size.region_count().1 > 1);

        for r in 0..dm.rows() {
            for c in 0..dm.cols() {
                let (rr, rc) = (r % fh, c % fw);
                let exp = if rc == 0 || rr == fh - 1 {
                    Some(Color::Dark)
                } else if rr == 0 {
                    Some(Color::from(rc % 2 == 0))
                } else if rc == fw - 1 {
                    Some(Color::from(rr % 2 == 1))
                } else {
                    None
                };
                match (dm.get(r, c), exp) {
                    (Module::Finder(col), Some(e)) => assert_eq!(col, e, "Module ({r}, {c})"),
                    (Module::Data(_), None) => {}
                    (m, e) => panic!("Module ({r}, {c}) is {m:?}, expected {e:?}"),
                }
            }
        }
    }

    #[test]
    fn test_forced_size_too_small() {
        let err = DMBuilder::new(b"Hello, world!").size(SizeId(2)).build().unwrap_err();
        assert!(matches!(err, DMError::InvalidForcedSize { rows: 12, cols: 12, capacity: 5, .. }));
        assert!(!err.is_internal());
    }

    #[test]
    fn test_from_text() {
        let dm = DMBuilder::from_text("Ärger").unwrap().build().unwrap();
        let exp = DMBuilder::new(b"\xC4rger").build().unwrap();
        assert_eq!(dm.codewords(), exp.codewords());
        assert_eq!(DMBuilder::from_text("→").err(), Some(DMError::InvalidChar));
    }
}

#[cfg(test)]
mod dm_proptests {
    use proptest::prelude::*;

    use dmism::*;

    fn ascii_len(data: &[u8]) -> usize {
        let mut len = 0;
        let mut i = 0;
        while i < data.len() {
            if data[i].is_ascii_digit() && data.get(i + 1).is_some_and(|b| b.is_ascii_digit()) {
                i += 2;
            } else {
                len += usize::from(data[i] > 127);
                i += 1;
            }
            len += 1;
        }
        len
    }

    pub fn data_strategy() -> BoxedStrategy<Vec<u8>> {
        prop_oneof![
            prop::collection::vec(any::<u8>(), 1..400),
            prop::collection::vec(prop::sample::select(b"ABCXYZ0189 ".to_vec()), 1..400),
            prop::collection::vec(prop::sample::select(b"abcxyz0189 ,".to_vec()), 1..400),
            prop::collection::vec(prop::sample::select(b"*>\r ABZ09a".to_vec()), 1..400),
            prop::collection::vec(prop::sample::select(b"./:;@[]^ABC".to_vec()), 1..400),
        ]
        .boxed()
    }

    proptest! {
        #[test]
        fn proptest_build(data in data_strategy(), rect_extension in any::<bool>()) {
            let mut builder = DMBuilder::new(&data);
            builder.rect_extension(rect_extension);
            let dm = builder.build().unwrap();
            let again = builder.build().unwrap();

            prop_assert_eq!(dm.grid(), again.grid());
            prop_assert_eq!(dm.codewords(), again.codewords());
            prop_assert!(dm.grid().iter().all(|&m| m != Module::Empty));

            let segs = dm.segments();
            prop_assert_eq!(segs.first().map(|s| s.start), Some(0));
            prop_assert_eq!(segs.last().map(|s| s.end()), Some(data.len()));
            for w in segs.windows(2) {
                prop_assert_eq!(w[0].end(), w[1].start);
            }
        }

        #[test]
        fn proptest_never_worse_than_ascii(data in data_strategy(), id in 1..=24usize) {
            let size = SizeId(id).symbol_size(false).unwrap();
            let res = DMBuilder::new(&data).size(SizeId(id)).build();
            if ascii_len(&data) <= size.data_codewords() {
                prop_assert!(res.is_ok());
            }
            if let Err(e) = res {
                prop_assert!(!e.is_internal());
            }
        }
    }
}
