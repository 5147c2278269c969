//! Little-endian UDP wire protocol for the external visualizer, and the
//! matching on-disk snapshot format.
//!
//! Datagrams are a packet-type byte followed by the payload. The
//! `GameState` payload layout is fixed: header (`u64` tick count, `f32`
//! tick rate, `u8` game mode, `u32` pad count, `u32` car count), ball
//! state with heatseeker info, then every pad and every car. All floats
//! are IEEE-754 single-precision little-endian.

use std::io::{self, Cursor, Read, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::path::Path;
use std::time::Duration;
use std::fs;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use glam::{Mat3A, Vec3A};

use crate::sim::{
    Arena, BallState, BoostPadConfig, BoostPadInfo, BoostPadState, CarConfig, CarControls,
    CarInfo, CarState, GameMode, GameState, Team, WheelPairConfig,
};

/// Port the visualizer listens on.
pub const VISER_PORT: u16 = 45243;
/// Port the simulator listens on.
pub const SIM_PORT: u16 = 34254;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketType {
    Quit = 0,
    GameState = 1,
    Connection = 2,
    Paused = 3,
    Speed = 4,
    Render = 5,
}

impl TryFrom<u8> for PacketType {
    type Error = io::Error;

    fn try_from(value: u8) -> io::Result<Self> {
        match value {
            0 => Ok(Self::Quit),
            1 => Ok(Self::GameState),
            2 => Ok(Self::Connection),
            3 => Ok(Self::Paused),
            4 => Ok(Self::Speed),
            5 => Ok(Self::Render),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown packet type {other}"),
            )),
        }
    }
}

fn write_vec(out: &mut Vec<u8>, v: Vec3A) -> io::Result<()> {
    out.write_f32::<LittleEndian>(v.x)?;
    out.write_f32::<LittleEndian>(v.y)?;
    out.write_f32::<LittleEndian>(v.z)
}

fn write_rot_mat(out: &mut Vec<u8>, m: Mat3A) -> io::Result<()> {
    write_vec(out, m.x_axis)?;
    write_vec(out, m.y_axis)?;
    write_vec(out, m.z_axis)
}

fn write_bool(out: &mut Vec<u8>, v: bool) -> io::Result<()> {
    out.write_u8(u8::from(v))
}

fn read_vec(input: &mut Cursor<&[u8]>) -> io::Result<Vec3A> {
    Ok(Vec3A::new(
        input.read_f32::<LittleEndian>()?,
        input.read_f32::<LittleEndian>()?,
        input.read_f32::<LittleEndian>()?,
    ))
}

fn read_rot_mat(input: &mut Cursor<&[u8]>) -> io::Result<Mat3A> {
    let forward = read_vec(input)?;
    let right = read_vec(input)?;
    let up = read_vec(input)?;
    Ok(Mat3A::from_cols(forward, right, up))
}

fn read_bool(input: &mut Cursor<&[u8]>) -> io::Result<bool> {
    Ok(input.read_u8()? != 0)
}

fn write_controls(out: &mut Vec<u8>, controls: &CarControls) -> io::Result<()> {
    out.write_f32::<LittleEndian>(controls.throttle)?;
    out.write_f32::<LittleEndian>(controls.steer)?;
    out.write_f32::<LittleEndian>(controls.pitch)?;
    out.write_f32::<LittleEndian>(controls.yaw)?;
    out.write_f32::<LittleEndian>(controls.roll)?;
    write_bool(out, controls.boost)?;
    write_bool(out, controls.jump)?;
    write_bool(out, controls.handbrake)
}

fn read_controls(input: &mut Cursor<&[u8]>) -> io::Result<CarControls> {
    Ok(CarControls {
        throttle: input.read_f32::<LittleEndian>()?,
        steer: input.read_f32::<LittleEndian>()?,
        pitch: input.read_f32::<LittleEndian>()?,
        yaw: input.read_f32::<LittleEndian>()?,
        roll: input.read_f32::<LittleEndian>()?,
        boost: read_bool(input)?,
        jump: read_bool(input)?,
        handbrake: read_bool(input)?,
    })
}

fn write_ball(out: &mut Vec<u8>, ball: &BallState) -> io::Result<()> {
    write_vec(out, ball.phys.pos)?;
    write_rot_mat(out, ball.phys.rot_mat)?;
    write_vec(out, ball.phys.vel)?;
    write_vec(out, ball.phys.ang_vel)?;
    out.write_f32::<LittleEndian>(ball.hs_info.y_target_dir)?;
    out.write_f32::<LittleEndian>(ball.hs_info.cur_target_speed)?;
    out.write_f32::<LittleEndian>(ball.hs_info.time_since_hit)
}

fn read_ball(input: &mut Cursor<&[u8]>) -> io::Result<BallState> {
    let mut ball = BallState::default();
    ball.phys.pos = read_vec(input)?;
    ball.phys.rot_mat = read_rot_mat(input)?;
    ball.phys.vel = read_vec(input)?;
    ball.phys.ang_vel = read_vec(input)?;
    ball.hs_info.y_target_dir = input.read_f32::<LittleEndian>()?;
    ball.hs_info.cur_target_speed = input.read_f32::<LittleEndian>()?;
    ball.hs_info.time_since_hit = input.read_f32::<LittleEndian>()?;
    Ok(ball)
}

fn write_pad(out: &mut Vec<u8>, pad: &BoostPadInfo) -> io::Result<()> {
    write_bool(out, pad.state.is_active)?;
    out.write_f32::<LittleEndian>(pad.state.cooldown)?;
    write_vec(out, pad.config.pos)?;
    write_bool(out, pad.config.is_big)
}

fn read_pad(input: &mut Cursor<&[u8]>) -> io::Result<BoostPadInfo> {
    let is_active = read_bool(input)?;
    let cooldown = input.read_f32::<LittleEndian>()?;
    let pos = read_vec(input)?;
    let is_big = read_bool(input)?;
    Ok(BoostPadInfo {
        config: BoostPadConfig { pos, is_big },
        state: BoostPadState { is_active, cooldown },
    })
}

fn write_car(out: &mut Vec<u8>, car: &CarInfo) -> io::Result<()> {
    out.write_u32::<LittleEndian>(car.id)?;
    out.write_u8(car.team as u8)?;

    let state = &car.state;
    write_vec(out, state.phys.pos)?;
    write_rot_mat(out, state.phys.rot_mat)?;
    write_vec(out, state.phys.vel)?;
    write_vec(out, state.phys.ang_vel)?;
    write_bool(out, state.is_on_ground)?;
    for wheel in state.wheels_with_contact {
        write_bool(out, wheel)?;
    }
    write_bool(out, state.has_jumped)?;
    write_bool(out, state.has_double_jumped)?;
    write_bool(out, state.has_flipped)?;
    write_vec(out, state.flip_rel_torque)?;
    out.write_f32::<LittleEndian>(state.jump_time)?;
    out.write_f32::<LittleEndian>(state.flip_time)?;
    write_bool(out, state.is_flipping)?;
    write_bool(out, state.is_jumping)?;
    out.write_f32::<LittleEndian>(state.air_time)?;
    out.write_f32::<LittleEndian>(state.air_time_since_jump)?;
    out.write_f32::<LittleEndian>(state.boost)?;
    out.write_f32::<LittleEndian>(state.time_since_boosted)?;
    write_bool(out, state.is_boosting)?;
    out.write_f32::<LittleEndian>(state.boosting_time)?;
    write_bool(out, state.is_supersonic)?;
    out.write_f32::<LittleEndian>(state.supersonic_time)?;
    out.write_f32::<LittleEndian>(state.handbrake_val)?;
    write_bool(out, state.is_auto_flipping)?;
    out.write_f32::<LittleEndian>(state.auto_flip_timer)?;
    out.write_f32::<LittleEndian>(state.auto_flip_torque_scale)?;
    write_bool(out, state.world_contact.has_contact)?;
    write_vec(out, state.world_contact.contact_normal)?;
    out.write_u32::<LittleEndian>(state.car_contact.other_car_id)?;
    out.write_f32::<LittleEndian>(state.car_contact.cooldown_timer)?;
    write_bool(out, state.is_demoed)?;
    out.write_f32::<LittleEndian>(state.demo_respawn_timer)?;

    let hit = state.ball_hit_info.unwrap_or_default();
    write_bool(out, state.ball_hit_info.is_some())?;
    write_vec(out, hit.relative_pos_on_ball)?;
    write_vec(out, hit.ball_pos)?;
    write_vec(out, hit.extra_hit_vel)?;
    out.write_u64::<LittleEndian>(hit.tick_count_when_hit)?;
    out.write_u64::<LittleEndian>(hit.tick_count_when_extra_impulse_applied)?;

    write_controls(out, &state.prev_controls)?;

    let config = &car.config;
    write_vec(out, config.hitbox_size)?;
    write_vec(out, config.hitbox_pos_offset)?;
    out.write_f32::<LittleEndian>(config.front_wheels.wheel_radius)?;
    out.write_f32::<LittleEndian>(config.front_wheels.suspension_rest_length)?;
    write_vec(out, config.front_wheels.connection_point_offset)?;
    out.write_f32::<LittleEndian>(config.back_wheels.wheel_radius)?;
    out.write_f32::<LittleEndian>(config.back_wheels.suspension_rest_length)?;
    write_vec(out, config.back_wheels.connection_point_offset)?;
    out.write_f32::<LittleEndian>(config.dodge_deadzone)
}

fn read_car(input: &mut Cursor<&[u8]>) -> io::Result<CarInfo> {
    let id = input.read_u32::<LittleEndian>()?;
    let team = Team::try_from(input.read_u8()?)
        .map_err(|()| io::Error::new(io::ErrorKind::InvalidData, "bad team byte"))?;

    let mut state = CarState::default();
    state.phys.pos = read_vec(input)?;
    state.phys.rot_mat = read_rot_mat(input)?;
    state.phys.vel = read_vec(input)?;
    state.phys.ang_vel = read_vec(input)?;
    state.is_on_ground = read_bool(input)?;
    for wheel in &mut state.wheels_with_contact {
        *wheel = read_bool(input)?;
    }
    state.has_jumped = read_bool(input)?;
    state.has_double_jumped = read_bool(input)?;
    state.has_flipped = read_bool(input)?;
    state.flip_rel_torque = read_vec(input)?;
    state.jump_time = input.read_f32::<LittleEndian>()?;
    state.flip_time = input.read_f32::<LittleEndian>()?;
    state.is_flipping = read_bool(input)?;
    state.is_jumping = read_bool(input)?;
    state.air_time = input.read_f32::<LittleEndian>()?;
    state.air_time_since_jump = input.read_f32::<LittleEndian>()?;
    state.boost = input.read_f32::<LittleEndian>()?;
    state.time_since_boosted = input.read_f32::<LittleEndian>()?;
    state.is_boosting = read_bool(input)?;
    state.boosting_time = input.read_f32::<LittleEndian>()?;
    state.is_supersonic = read_bool(input)?;
    state.supersonic_time = input.read_f32::<LittleEndian>()?;
    state.handbrake_val = input.read_f32::<LittleEndian>()?;
    state.is_auto_flipping = read_bool(input)?;
    state.auto_flip_timer = input.read_f32::<LittleEndian>()?;
    state.auto_flip_torque_scale = input.read_f32::<LittleEndian>()?;
    state.world_contact.has_contact = read_bool(input)?;
    state.world_contact.contact_normal = read_vec(input)?;
    state.car_contact.other_car_id = input.read_u32::<LittleEndian>()?;
    state.car_contact.cooldown_timer = input.read_f32::<LittleEndian>()?;
    state.is_demoed = read_bool(input)?;
    state.demo_respawn_timer = input.read_f32::<LittleEndian>()?;

    let hit_is_valid = read_bool(input)?;
    let hit = crate::sim::BallHitInfo {
        relative_pos_on_ball: read_vec(input)?,
        ball_pos: read_vec(input)?,
        extra_hit_vel: read_vec(input)?,
        tick_count_when_hit: input.read_u64::<LittleEndian>()?,
        tick_count_when_extra_impulse_applied: input.read_u64::<LittleEndian>()?,
    };
    state.ball_hit_info = hit_is_valid.then_some(hit);

    let controls = read_controls(input)?;
    state.prev_controls = controls;
    state.controls = controls;

    let config = CarConfig {
        hitbox_size: read_vec(input)?,
        hitbox_pos_offset: read_vec(input)?,
        front_wheels: WheelPairConfig {
            wheel_radius: input.read_f32::<LittleEndian>()?,
            suspension_rest_length: input.read_f32::<LittleEndian>()?,
            connection_point_offset: read_vec(input)?,
        },
        back_wheels: WheelPairConfig {
            wheel_radius: input.read_f32::<LittleEndian>()?,
            suspension_rest_length: input.read_f32::<LittleEndian>()?,
            connection_point_offset: read_vec(input)?,
        },
        dodge_deadzone: input.read_f32::<LittleEndian>()?,
    };

    Ok(CarInfo {
        id,
        team,
        state,
        config,
    })
}

impl GameState {
    /// Serialize to the wire/disk byte layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64 + self.pads.len() * 18 + self.cars.len() * 256);

        // Writing into a Vec cannot fail.
        (|| -> io::Result<()> {
            out.write_u64::<LittleEndian>(self.tick_count)?;
            out.write_f32::<LittleEndian>(self.tick_rate)?;
            out.write_u8(self.game_mode as u8)?;
            out.write_u32::<LittleEndian>(self.pads.len() as u32)?;
            out.write_u32::<LittleEndian>(self.cars.len() as u32)?;

            write_ball(&mut out, &self.ball)?;
            for pad in &self.pads {
                write_pad(&mut out, pad)?;
            }
            for car in &self.cars {
                write_car(&mut out, car)?;
            }
            Ok(())
        })()
        .expect("writing to a Vec is infallible");

        out
    }

    /// Parse the wire/disk byte layout.
    pub fn from_bytes(bytes: &[u8]) -> io::Result<Self> {
        let mut input = Cursor::new(bytes);

        let tick_count = input.read_u64::<LittleEndian>()?;
        let tick_rate = input.read_f32::<LittleEndian>()?;
        let game_mode = GameMode::try_from(input.read_u8()?)
            .map_err(|()| io::Error::new(io::ErrorKind::InvalidData, "bad game mode byte"))?;
        let num_pads = input.read_u32::<LittleEndian>()? as usize;
        let num_cars = input.read_u32::<LittleEndian>()? as usize;

        let ball = read_ball(&mut input)?;

        let mut pads = Vec::with_capacity(num_pads);
        for _ in 0..num_pads {
            pads.push(read_pad(&mut input)?);
        }

        let mut cars = Vec::with_capacity(num_cars);
        for _ in 0..num_cars {
            cars.push(read_car(&mut input)?);
        }

        Ok(Self {
            tick_count,
            tick_rate,
            game_mode,
            ball,
            pads,
            cars,
        })
    }

    /// Write the snapshot to disk in the wire byte layout.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        fs::File::create(path)?.write_all(&self.to_bytes())
    }

    /// Read a snapshot previously written with [`GameState::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut bytes = Vec::new();
        fs::File::open(path)?.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }
}

/// Control messages received from the visualizer.
#[derive(Clone, Debug, Default)]
pub struct ViserMessages {
    pub paused: Option<bool>,
    pub speed: Option<f32>,
    pub game_state: Option<GameState>,
}

/// UDP driver for the external visualizer. Launch the visualizer
/// yourself; this side binds the simulator port and streams state.
pub struct ViserSocket {
    socket: UdpSocket,
    viser_addr: SocketAddr,
    recv_buffer: Vec<u8>,
    paused: bool,
    game_speed: f32,
}

impl ViserSocket {
    pub fn new() -> io::Result<Self> {
        Self::new_with_addrs(
            SIM_PORT,
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), VISER_PORT),
        )
    }

    pub fn new_with_addrs(sim_port: u16, viser_addr: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", sim_port))?;
        socket.set_nonblocking(true)?;

        let this = Self {
            socket,
            viser_addr,
            recv_buffer: vec![0; 65536],
            paused: false,
            game_speed: 1.0,
        };
        this.send_packet(PacketType::Connection, &[])?;
        Ok(this)
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub const fn game_speed(&self) -> f32 {
        self.game_speed
    }

    /// Interval between renders at the current speed, for pacing loops.
    #[must_use]
    pub fn render_interval(&self) -> Duration {
        Duration::from_secs_f32(1.0 / (120.0 * self.game_speed))
    }

    fn send_packet(&self, packet_type: PacketType, payload: &[u8]) -> io::Result<()> {
        let mut datagram = Vec::with_capacity(1 + payload.len());
        datagram.push(packet_type as u8);
        datagram.extend_from_slice(payload);
        self.socket.send_to(&datagram, self.viser_addr)?;
        Ok(())
    }

    pub fn send_state(&self, arena: &Arena) -> io::Result<()> {
        self.send_packet(PacketType::GameState, &arena.get_game_state().to_bytes())
    }

    /// Drain pending datagrams, returning any pause/speed/state changes
    /// the visualizer pushed.
    pub fn poll(&mut self) -> io::Result<ViserMessages> {
        let mut messages = ViserMessages::default();

        loop {
            let len = match self.socket.recv(&mut self.recv_buffer) {
                Ok(len) => len,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
                Err(err) => return Err(err),
            };
            if len == 0 {
                continue;
            }

            let packet_type = PacketType::try_from(self.recv_buffer[0])?;
            let payload = &self.recv_buffer[1..len];

            match packet_type {
                PacketType::Paused => {
                    let paused = payload.first().is_some_and(|&byte| byte != 0);
                    self.paused = paused;
                    messages.paused = Some(paused);
                }
                PacketType::Speed => {
                    let mut cursor = Cursor::new(payload);
                    let speed = cursor.read_f32::<LittleEndian>()?;
                    self.game_speed = speed;
                    messages.speed = Some(speed);
                }
                PacketType::GameState => {
                    messages.game_state = Some(GameState::from_bytes(payload)?);
                }
                PacketType::Quit | PacketType::Connection | PacketType::Render => {}
            }
        }

        Ok(messages)
    }

    pub fn quit(self) -> io::Result<()> {
        self.send_packet(PacketType::Quit, &[])
    }
}
