//! Geofence matching between events and subscribers.

use database::{Event, User};

/// Distance from an event to a user's subscribed location.
///
/// `None` when either side has no valid coordinates.
pub fn distance_to_user(event: &Event, user: &User) -> Option<f64> {
    let (event_lat, event_lng) = event.position()?;
    let (user_lat, user_lng) = user.position()?;
    Some(geo::distance_km(event_lat, event_lng, user_lat, user_lng))
}

/// Decide whether a user should be alerted about an event.
///
/// Requires valid coordinates on both sides, alerts enabled, and the
/// distance within the user's radius. The boundary is inclusive: exactly
/// at the radius still counts. Invalid coordinates never match.
pub fn is_in_range(event: &Event, user: &User) -> bool {
    if !user.alerts_enabled {
        return false;
    }
    match distance_to_user(event, user) {
        Some(distance) => distance <= user.alert_radius_km,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::{NewEvent, NewUser};

    // One degree of latitude spans ~111.195 km on the reference sphere.
    const KM_PER_DEGREE: f64 = 111.195;

    fn event_at(lat: Option<f64>, lng: Option<f64>) -> Event {
        NewEvent {
            source_link: "https://feed.example/event/1".to_string(),
            title: "Red flood alert".to_string(),
            alert_type: "FL".to_string(),
            alert_level: "Red".to_string(),
            lat,
            lng,
            ..NewEvent::default()
        }
        .into_event(1)
    }

    fn user_at(lat: f64, lng: f64, radius_km: f64) -> User {
        NewUser {
            name: "Kim".to_string(),
            email: "kim@example.com".to_string(),
            lat: Some(lat),
            lng: Some(lng),
            alert_radius_km: radius_km,
            alerts_enabled: true,
            ..NewUser::default()
        }
        .into_user(1)
    }

    #[test]
    fn boundary_is_inclusive() {
        let event = event_at(Some(-27.5), Some(153.0));

        // Same point, zero radius: distance is exactly the radius.
        assert!(is_in_range(&event, &user_at(-27.5, 153.0, 0.0)));

        // Any separation at all pushes past a zero radius.
        assert!(!is_in_range(&event, &user_at(-27.5001, 153.0, 0.0)));
    }

    #[test]
    fn radius_separates_near_from_far() {
        let event = event_at(Some(-27.5), Some(153.0));

        let near = user_at(-27.5 + 0.44 * 1.0, 153.0, 50.0); // ~48.9 km
        let far = user_at(-27.5 + 0.46 * 1.0, 153.0, 50.0); // ~51.1 km
        assert!(is_in_range(&event, &near));
        assert!(!is_in_range(&event, &far));

        let d = distance_to_user(&event, &near).unwrap();
        assert!((d - 0.44 * KM_PER_DEGREE).abs() < 0.1);
    }

    #[test]
    fn disabled_users_never_match() {
        let event = event_at(Some(-27.5), Some(153.0));
        let mut user = user_at(-27.5, 153.0, 50.0);
        user.alerts_enabled = false;
        assert!(!is_in_range(&event, &user));
    }

    #[test]
    fn missing_coordinates_never_match() {
        let user = user_at(-27.5, 153.0, 50.0);
        assert!(!is_in_range(&event_at(None, None), &user));
        assert!(!is_in_range(&event_at(Some(-27.5), None), &user));

        let event = event_at(Some(-27.5), Some(153.0));
        let mut no_position = user_at(-27.5, 153.0, 50.0);
        no_position.lat = None;
        assert!(!is_in_range(&event, &no_position));
        assert_eq!(distance_to_user(&event, &no_position), None);
    }
}
