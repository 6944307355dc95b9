use super::*;

#[test]
fn zero_sized_rasters_are_rejected() {
    assert!(Raster::new(0, 4).is_err());
    assert!(Raster::new(4, 0).is_err());
}

#[test]
fn buffer_length_is_validated() {
    assert!(Raster::from_premul_rgba8(2, 2, vec![0; 15]).is_err());
    let r = Raster::from_premul_rgba8(2, 2, vec![0; 16]).unwrap();
    assert_eq!(r.dimensions(), (2, 2));
}

#[test]
fn straight_alpha_round_trips_through_premul() {
    let r = Raster::from_straight_rgba8(1, 1, vec![200, 100, 50, 128]).unwrap();
    assert_eq!(
        r.pixel(0, 0).unwrap(),
        Rgba8Premul::from_straight_rgba(200, 100, 50, 128)
    );
    let back = r.to_straight_rgba8();
    for (got, want) in back.iter().zip([200u8, 100, 50, 128]) {
        assert!((i16::from(*got) - i16::from(want)).abs() <= 1);
    }
}

#[test]
fn pixel_outside_bounds_is_none() {
    let r = Raster::filled(3, 2, Rgba8Premul::from_straight_rgba(1, 2, 3, 255)).unwrap();
    assert!(r.pixel(3, 0).is_none());
    assert!(r.pixel(0, 2).is_none());
    assert_eq!(r.pixel(2, 1).unwrap().to_array(), [1, 2, 3, 255]);
}

#[test]
fn ledger_counts_each_raster_once() {
    let ledger = RasterLedger::new();
    let r = ledger.track(Raster::new(1, 1).unwrap());
    let r = ledger.track(r);
    assert_eq!(ledger.stats().created, 1);
    assert_eq!(ledger.live(), 1);

    drop(r);
    assert_eq!(
        ledger.stats(),
        LedgerStats {
            created: 1,
            released: 1
        }
    );
}

#[test]
fn into_buffer_still_records_release() {
    let ledger = RasterLedger::new();
    let r = ledger.track(Raster::new(2, 1).unwrap());
    let bytes = r.into_premul_rgba8();
    assert_eq!(bytes.len(), 8);
    assert_eq!(ledger.live(), 0);
}
