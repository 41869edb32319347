//! Sun/earth/moon kinematics.
//!
//! Everything here is a pure function of the simulated day and the body
//! constants: angles grow without wrapping, orbits are circles on the XZ
//! plane, and each body orbits the position returned for its parent.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SUN_EARTH_DISTANCE: f32 = 24.0;
pub const EARTH_MOON_DISTANCE: f32 = 8.0;

pub const EARTH_ORBIT_DAYS: f32 = 365.0;
pub const MOON_ORBIT_DAYS: f32 = 27.0;

pub const SUN_ROTATION_DAYS: f32 = 27.0;
pub const EARTH_ROTATION_DAYS: f32 = 1.0;
pub const MOON_ROTATION_DAYS: f32 = 27.0;

pub const EARTH_AXIAL_TILT: f32 = -23.4;

pub const SUN_SCALE: f32 = 6.0;
pub const EARTH_SCALE: f32 = 3.0;
pub const MOON_SCALE: f32 = 1.5;

#[derive(Debug, Error, PartialEq)]
pub enum OrbitError {
    #[error("period must be a finite, non-zero number of days (got {0})")]
    InvalidPeriod(f32),
    #[error("{what} must be finite and non-negative (got {value})")]
    InvalidLength { what: &'static str, value: f32 },
    #[error("axial tilt must be a finite number of degrees (got {0})")]
    InvalidTilt(f32),
}

/// Days per revolution. Never zero or non-finite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Period(f32);

impl Period {
    pub fn days(days: f32) -> Result<Self, OrbitError> {
        if days == 0.0 || !days.is_finite() {
            return Err(OrbitError::InvalidPeriod(days));
        }
        Ok(Self(days))
    }

    fn degrees_per_day(self) -> f32 {
        360.0 / self.0
    }
}

fn length(what: &'static str, value: f32) -> Result<f32, OrbitError> {
    if value < 0.0 || !value.is_finite() {
        return Err(OrbitError::InvalidLength { what, value });
    }
    Ok(value)
}

/// Spin angle in degrees, not wrapped to [0, 360).
pub fn angle_around_self(day: f32, rotation: Period) -> f32 {
    day * rotation.degrees_per_day()
}

/// Orbital angle in degrees, not wrapped to [0, 360).
pub fn angle_around_parent(day: f32, orbit: Period) -> f32 {
    day * orbit.degrees_per_day()
}

/// Offset from the orbit center on the XZ plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Offset {
    pub x: f32,
    pub z: f32,
}

impl Offset {
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.z)
    }
}

/// Circle point for `angle` degrees. z is negated: the result is +x rotated
/// about +y by `angle`, scaled by `radius`.
pub fn position_from_angle(angle: f32, radius: f32) -> Offset {
    let (s, c) = angle.to_radians().sin_cos();
    Offset {
        x: radius * c,
        z: -radius * s,
    }
}

/// Whether the Moon's scale step survives into its transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoonScale {
    /// Scale is computed and then dropped, so the Moon renders at unit size.
    #[default]
    Reference,
    Corrected,
}

impl MoonScale {
    pub fn toggled(self) -> Self {
        match self {
            MoonScale::Reference => MoonScale::Corrected,
            MoonScale::Corrected => MoonScale::Reference,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Sun,
    Earth,
    Moon(MoonScale),
}

/// Model matrix for one body. Composition order differs per body:
///
/// - Sun: `scale * spin`, never translated
/// - Earth: `translate * scale * tilt * spin`
/// - Moon: `translate * spin`, or `translate * scale * spin` when corrected
pub fn compose_body_transform(
    kind: BodyKind,
    position: Vec3,
    scale: f32,
    axial_tilt: f32,
    self_rotation: f32,
) -> Mat4 {
    let spin = Mat4::from_rotation_y(self_rotation.to_radians());
    let scale = Mat4::from_scale(Vec3::splat(scale));
    let translate = Mat4::from_translation(position);
    match kind {
        BodyKind::Sun => scale * spin,
        BodyKind::Earth => {
            translate * scale * Mat4::from_rotation_z(axial_tilt.to_radians()) * spin
        }
        BodyKind::Moon(MoonScale::Reference) => translate * spin,
        BodyKind::Moon(MoonScale::Corrected) => translate * scale * spin,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orbit {
    pub period: Period,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub kind: BodyKind,
    pub rotation: Period,
    pub orbit: Option<Orbit>,
    pub scale: f32,
    pub axial_tilt: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub transform: Mat4,
}

impl Body {
    /// `orbit` is `(period_days, radius)`.
    pub fn new(
        kind: BodyKind,
        rotation_days: f32,
        orbit: Option<(f32, f32)>,
        scale: f32,
        axial_tilt: f32,
    ) -> Result<Self, OrbitError> {
        let orbit = match orbit {
            Some((period, radius)) => Some(Orbit {
                period: Period::days(period)?,
                radius: length("orbital radius", radius)?,
            }),
            None => None,
        };
        if !axial_tilt.is_finite() {
            return Err(OrbitError::InvalidTilt(axial_tilt));
        }
        Ok(Self {
            kind,
            rotation: Period::days(rotation_days)?,
            orbit,
            scale: length("scale", scale)?,
            axial_tilt,
        })
    }

    pub fn sun() -> Result<Self, OrbitError> {
        Self::new(BodyKind::Sun, SUN_ROTATION_DAYS, None, SUN_SCALE, 0.0)
    }

    pub fn earth() -> Result<Self, OrbitError> {
        Self::new(
            BodyKind::Earth,
            EARTH_ROTATION_DAYS,
            Some((EARTH_ORBIT_DAYS, SUN_EARTH_DISTANCE)),
            EARTH_SCALE,
            EARTH_AXIAL_TILT,
        )
    }

    pub fn moon(mode: MoonScale) -> Result<Self, OrbitError> {
        Self::new(
            BodyKind::Moon(mode),
            MOON_ROTATION_DAYS,
            Some((MOON_ORBIT_DAYS, EARTH_MOON_DISTANCE)),
            MOON_SCALE,
            0.0,
        )
    }

    /// Offset from the orbit center; zero for bodies that do not orbit.
    pub fn offset(&self, day: f32) -> Offset {
        match self.orbit {
            Some(o) => position_from_angle(angle_around_parent(day, o.period), o.radius),
            None => Offset { x: 0.0, z: 0.0 },
        }
    }

    pub fn pose(&self, day: f32, orbit_center: Vec3) -> Pose {
        let position = orbit_center + self.offset(day).to_vec3();
        let transform = compose_body_transform(
            self.kind,
            position,
            self.scale,
            self.axial_tilt,
            angle_around_self(day, self.rotation),
        );
        Pose {
            position,
            transform,
        }
    }
}

/// The three bodies, in dependency order.
#[derive(Clone, Copy, Debug)]
pub struct SolarSystem {
    pub sun: Body,
    pub earth: Body,
    pub moon: Body,
}

impl SolarSystem {
    pub fn new(moon: MoonScale) -> Result<Self, OrbitError> {
        Ok(Self {
            sun: Body::sun()?,
            earth: Body::earth()?,
            moon: Body::moon(moon)?,
        })
    }

    /// Sun at the origin, Earth around the Sun, Moon around the Earth.
    pub fn poses(&self, day: f32) -> [Pose; 3] {
        let sun = self.sun.pose(day, Vec3::ZERO);
        let earth = self.earth.pose(day, sun.position);
        let moon = self.moon.pose(day, earth.position);
        [sun, earth, moon]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn one_degree_per_day_period_returns_the_day() {
        let p = Period::days(360.0).unwrap();
        for day in [0.0, 0.5, 1.0, 91.25, 1234.5, -7.0] {
            assert_eq!(angle_around_self(day, p), day);
            assert_eq!(angle_around_parent(day, p), day);
        }
    }

    #[test]
    fn angles_are_not_wrapped() {
        let year = Period::days(EARTH_ORBIT_DAYS).unwrap();
        assert!((angle_around_parent(730.0, year) - 720.0).abs() < EPS);
    }

    #[test]
    fn position_sign_convention() {
        let r = 5.0;
        assert_eq!(position_from_angle(0.0, r), Offset { x: r, z: 0.0 });
        let q = position_from_angle(90.0, r);
        assert!(q.x.abs() < EPS && (q.z + r).abs() < EPS);
        let h = position_from_angle(180.0, r);
        assert!((h.x + r).abs() < EPS && h.z.abs() < EPS);
    }

    #[test]
    fn position_is_periodic() {
        for i in 0..36 {
            let angle = i as f32 * 17.5 - 200.0;
            for r in [0.0, 1.0, 24.0] {
                let a = position_from_angle(angle, r).to_vec3();
                let b = position_from_angle(angle + 360.0, r).to_vec3();
                assert!(close(a, b), "angle {angle} radius {r}");
            }
        }
    }

    #[test]
    fn zero_and_non_finite_periods_are_rejected() {
        assert_eq!(Period::days(0.0), Err(OrbitError::InvalidPeriod(0.0)));
        assert!(Period::days(f32::NAN).is_err());
        assert!(Period::days(f32::INFINITY).is_err());
        assert!(Period::days(-27.0).is_ok());
        assert_eq!(
            Body::new(BodyKind::Sun, 0.0, None, 1.0, 0.0),
            Err(OrbitError::InvalidPeriod(0.0))
        );
        let still = Body::new(BodyKind::Earth, 1.0, Some((0.0, 24.0)), 1.0, 0.0);
        assert!(still.is_err());
    }

    #[test]
    fn negative_radius_or_scale_is_rejected() {
        assert_eq!(
            Body::new(BodyKind::Earth, 1.0, Some((365.0, -1.0)), 1.0, 0.0),
            Err(OrbitError::InvalidLength {
                what: "orbital radius",
                value: -1.0,
            })
        );
        assert!(Body::new(BodyKind::Sun, 1.0, None, -2.0, 0.0).is_err());
    }

    #[test]
    fn tilt_may_be_negative_but_not_infinite() {
        let tilted = Body::new(BodyKind::Earth, 1.0, None, 1.0, EARTH_AXIAL_TILT);
        assert!(tilted.is_ok());
        assert_eq!(
            Body::new(BodyKind::Earth, 1.0, None, 1.0, f32::INFINITY),
            Err(OrbitError::InvalidTilt(f32::INFINITY))
        );
        let nan = Body::new(BodyKind::Earth, 1.0, None, 1.0, f32::NAN);
        let err = nan.unwrap_err();
        assert!(matches!(err, OrbitError::InvalidTilt(t) if t.is_nan()));
        assert!(!err.to_string().contains("non-negative"));
    }

    #[test]
    fn day_zero_places_sun_at_origin_and_earth_on_x_axis() {
        let sys = SolarSystem::new(MoonScale::Reference).unwrap();
        let [sun, earth, _] = sys.poses(0.0);
        assert_eq!(sun.position, Vec3::ZERO);
        assert!(close(earth.position, Vec3::new(SUN_EARTH_DISTANCE, 0.0, 0.0)));
        assert!(close(earth.transform.transform_point3(Vec3::ZERO), earth.position));
    }

    #[test]
    fn quarter_year_moves_earth_to_negative_z() {
        let earth = Body::earth().unwrap();
        let off = earth.offset(EARTH_ORBIT_DAYS / 4.0).to_vec3();
        let expected = Vec3::new(0.0, 0.0, -SUN_EARTH_DISTANCE);
        assert!(close(off, expected), "{off:?}");
    }

    #[test]
    fn moon_orbits_the_earth_position() {
        let sys = SolarSystem::new(MoonScale::Reference).unwrap();
        for day in [0.0, 3.5, 50.0, 400.25] {
            let [_, earth, moon] = sys.poses(day);
            let moon_orbit = Period::days(MOON_ORBIT_DAYS).unwrap();
            let rel =
                position_from_angle(angle_around_parent(day, moon_orbit), EARTH_MOON_DISTANCE);
            let expected = earth.position + rel.to_vec3();
            assert!(close(moon.position, expected), "day {day}");
            assert_eq!(moon.position.y, 0.0);
        }
    }

    #[test]
    fn sun_is_scaled_and_spun_in_place() {
        let sun = Body::sun().unwrap().pose(13.5, Vec3::ZERO);
        assert_eq!(sun.transform.transform_point3(Vec3::ZERO), Vec3::ZERO);
        assert!((sun.transform.transform_vector3(Vec3::Y).length() - SUN_SCALE).abs() < EPS);
        // half a rotation period turns +x into -x
        let x = sun.transform.transform_vector3(Vec3::X) / SUN_SCALE;
        assert!(close(x, Vec3::NEG_X), "{x:?}");
    }

    #[test]
    fn earth_axis_is_tilted() {
        let earth = Body::earth().unwrap().pose(10.3, Vec3::ZERO);
        let axis = earth.transform.transform_vector3(Vec3::Y);
        assert!((axis.length() - EARTH_SCALE).abs() < EPS);
        let tilt = axis.normalize().dot(Vec3::Y).acos().to_degrees();
        assert!((tilt - EARTH_AXIAL_TILT.abs()).abs() < EPS, "{tilt}");
    }

    #[test]
    fn reference_moon_drops_its_scale() {
        let day = 5.0;
        let reference = Body::moon(MoonScale::Reference)
            .unwrap()
            .pose(day, Vec3::ZERO);
        let corrected = Body::moon(MoonScale::Corrected)
            .unwrap()
            .pose(day, Vec3::ZERO);
        assert_eq!(reference.position, corrected.position);
        assert!((reference.transform.transform_vector3(Vec3::X).length() - 1.0).abs() < EPS);
        assert!(
            (corrected.transform.transform_vector3(Vec3::X).length() - MOON_SCALE).abs() < EPS
        );
    }

    #[test]
    fn poses_are_pure_functions_of_the_day() {
        let sys = SolarSystem::new(MoonScale::Corrected).unwrap();
        let a = sys.poses(123.0);
        let _ = sys.poses(7.0);
        assert_eq!(a, sys.poses(123.0));
    }

    #[test]
    fn moon_scale_parses_lowercase() {
        let m: MoonScale = serde_json::from_str("\"corrected\"").unwrap();
        assert_eq!(m, MoonScale::Corrected);
        assert_eq!(m.toggled(), MoonScale::Reference);
    }
}
