#[cfg(feature = "std")]
mod tests {
    use sensor_processor::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::{sync::Arc, thread, time::Duration};

    fn raw(pairs: &[(&str, FieldValue)]) -> RawReadingBatch {
        RawReadingBatch::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_batch_keys_and_pass_through() {
        let dispatcher = ReadingDispatcher::new(&SensorCalibration::icp(CalibrationVector::new([
            1795, -820, 2412, 3605,
        ])));
        let foo = FieldValue::Float(-0.000123);
        let processed = dispatcher
            .process_reading(&raw(&[
                ("time", FieldValue::Integer(1_600_000_123)),
                ("pres_raw", FieldValue::Integer(6_000_000)),
                ("temp_icp_raw", FieldValue::Integer(30000)),
                ("foo", foo),
            ]))
            .unwrap();

        let names: Vec<&str> = processed.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["time", "pres", "temp_icp", "foo"]);

        assert_eq!(Some(FieldValue::Integer(1_600_000_123)), processed.get("time"));
        match processed.get("foo") {
            Some(FieldValue::Float(value)) => assert_eq!(value.to_bits(), (-0.000123f64).to_bits()),
            other => panic!("unexpected foo: {:?}", other),
        }

        let expected_pressure = dispatcher
            .icp()
            .convert_pressure(6_000_000, 30000)
            .unwrap()
            .pascals();
        assert_eq!(Some(FieldValue::Float(expected_pressure)), processed.get("pres"));
        assert_eq!(
            Some(FieldValue::Float(-45.0 + 175.0 / 65536.0 * 30000.0)),
            processed.get("temp_icp")
        );
    }

    #[test]
    fn test_pressure_requires_icp_temperature() {
        let dispatcher = ReadingDispatcher::default();
        let result = dispatcher.process_reading(&raw(&[
            ("time", FieldValue::Integer(1)),
            ("pres_raw", FieldValue::Integer(6_000_000)),
            ("humid_raw", FieldValue::Integer(40000)),
        ]));
        assert!(matches!(
            result,
            Err(ProcessError::MissingCompanion {
                field: "pres_raw",
                companion: "temp_icp_raw"
            })
        ));
    }

    #[test]
    fn test_event_from_json_round_trip_through_dispatcher() {
        let event = Event::from_json(
            br#"{"calib": {"icp": [0, 0, 0, 3500]},
                 "rdg0": {"time": 1000000, "pres_raw": 3670016, "temp_icp_raw": 32768, "opt_raw": 4196},
                 "rdg1": {"time": 2000000, "pres_raw": 12058624, "temp_icp_raw": 32768, "humid_raw": 51234, "temp_shtc_raw": 22750}}"#,
        )
        .unwrap();

        let dispatcher = ReadingDispatcher::default();
        let mut processed = Vec::new();
        let delivered = dispatcher.handle_event(&event, &mut |r: &ProcessedReadingBatch| {
            processed.push(r.clone())
        });
        assert_eq!(2, delivered);

        let first = &processed[0];
        assert!((first.get("pres").unwrap().as_f64() - 45000.0).abs() < 1e-3);
        assert_eq!(Some(FieldValue::Float(42.5)), first.get("temp_icp"));
        assert_eq!(Some(FieldValue::Float(240.0)), first.get("opt"));
        assert_eq!(Some(1.0), first.timestamp_secs());

        let second = &processed[1];
        assert!((second.get("pres").unwrap().as_f64() - 105000.0).abs() < 1e-3);
        assert_eq!(Some(FieldValue::Float(51.234)), second.get("humid"));
        assert_eq!(Some(FieldValue::Float(22.75)), second.get("temp_shtc"));
    }

    #[test]
    fn test_calibration_swaps_are_never_torn() {
        let a = CalibrationVector::new([1795, -820, 2412, 3605]);
        let b = CalibrationVector::new([-300, 1500, -2000, 3400]);
        let dispatcher = Arc::new(ReadingDispatcher::new(&SensorCalibration::icp(a)));

        let expected_a = Icp101xx::new(a).convert_pressure(6_000_000, 20000).unwrap();
        let expected_b = Icp101xx::new(b).convert_pressure(6_000_000, 20000).unwrap();
        assert_ne!(expected_a, expected_b);

        let done = Arc::new(AtomicBool::new(false));
        let writer = {
            let dispatcher = dispatcher.clone();
            let done = done.clone();
            thread::spawn(move || {
                let mut flip = false;
                while !done.load(Ordering::SeqCst) {
                    let vector = if flip { a } else { b };
                    dispatcher.set_calibration(&SensorCalibration::icp(vector));
                    flip = !flip;
                }
            })
        };

        for _ in 0..10_000 {
            let p = dispatcher.icp().convert_pressure(6_000_000, 20000).unwrap();
            assert!(p == expected_a || p == expected_b, "torn calibration: {:?}", p);
        }
        done.store(true, Ordering::SeqCst);
        writer.join().unwrap();
    }

    static QUEUE: EventQueue<2> = EventQueue::new();

    #[test]
    fn test_producer_consumer() {
        let producer = thread::spawn(|| {
            for i in 0..10i64 {
                let mut event = Event::default();
                event
                    .readings
                    .push(
                        RawReadingBatch::from_pairs([
                            ("time", FieldValue::Integer(i)),
                            ("humid_raw", FieldValue::Integer(i * 1000)),
                        ])
                        .unwrap(),
                    )
                    .unwrap();
                futures::executor::block_on(QUEUE.send(event));
            }
        });

        let dispatcher = ReadingDispatcher::default();
        let mut humidities = Vec::new();
        while humidities.len() < 10 {
            let n = QUEUE.drain(&dispatcher, &mut |r: &ProcessedReadingBatch| {
                humidities.push(r.get("humid").map(|v| v.as_f64()))
            });
            if n == 0 {
                thread::sleep(Duration::from_millis(1));
            }
        }
        producer.join().unwrap();

        let expected: Vec<Option<f64>> = (0..10).map(|i| Some(i as f64)).collect();
        assert_eq!(expected, humidities);
    }
}
