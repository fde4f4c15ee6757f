//! Instant-hit weapons resolved with a ray cast per muzzle.

use crate::{
    apply_damage, spawn_impact, FireContext, FireOutcome, HitResult, Shot, ShotResult, Tracer,
    TracerStyle, WeaponBase, DEFAULT_IMPACT_LIFETIME,
};
use engine_core::Ray;
use physics::RayQuery;

#[derive(Debug, Clone)]
pub struct HitScanWeapon {
    pub base: WeaponBase,
    pub range: f32,
    pub damage: f32,
    /// Impact effect lifetime; no effect is spawned when `None`.
    pub impact_lifetime: Option<f32>,
    pub tracer: TracerStyle,
}

impl HitScanWeapon {
    pub fn new(base: WeaponBase, range: f32, damage: f32) -> Self {
        Self {
            base,
            range,
            damage,
            impact_lifetime: Some(DEFAULT_IMPACT_LIFETIME),
            tracer: TracerStyle::default(),
        }
    }

    pub fn with_tracer(mut self, tracer: TracerStyle) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn with_impact_lifetime(mut self, lifetime: Option<f32>) -> Self {
        self.impact_lifetime = lifetime;
        self
    }

    pub fn fire(&mut self, aim: Ray, ctx: &mut FireContext) -> FireOutcome {
        let Some(selected) = self.base.commit(ctx.now) else {
            return FireOutcome::CoolingDown;
        };

        let mut shots = Vec::with_capacity(selected.len());
        for index in selected {
            let Some(muzzle) = self.base.muzzles.get(index).copied() else {
                continue;
            };
            let ray = muzzle.aim_ray(aim, ctx.aim);
            let start = muzzle.world_transform(&ctx.owner.transform).position;

            let query = RayQuery::new(ray, self.range, self.base.hit_mask).excluding(ctx.owner.body);
            let result = match ctx.raycaster.cast(&query) {
                Some(hit) => {
                    if let Some(target) = hit.entity {
                        if apply_damage(ctx.world, target, self.damage) {
                            log::debug!("{} killed {:?}", self.base.name, target);
                        }
                    }
                    if let Some(lifetime) = self.impact_lifetime {
                        spawn_impact(ctx.world, hit.point, hit.normal, lifetime);
                    }
                    HitResult::Hit {
                        point: hit.point,
                        normal: hit.normal,
                        target: hit.entity,
                    }
                }
                None => HitResult::Miss {
                    endpoint: start + ray.direction * self.range,
                },
            };

            let tracer = Tracer::new(
                start,
                result.end_point(),
                &self.tracer,
                &ctx.owner.transform,
                &mut *ctx.rng,
            );
            ctx.world.spawn((tracer,));

            shots.push(Shot {
                muzzle: index,
                origin: start,
                direction: ray.direction,
                result: ShotResult::Ray(result),
            });
        }
        FireOutcome::Fired(shots)
    }
}
