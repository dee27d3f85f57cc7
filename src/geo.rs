/// Great-circle distance between two WGS84 coordinates in kilometers,
/// computed with the haversine formula.
///
/// Pure and infallible: inputs are taken as plain floating-point degrees and
/// are not range-checked, so out-of-range coordinates yield a numerically
/// valid but meaningless distance.
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
