pub type Endpoint = str;

pub const LOGIN: &Endpoint = "LoginAPI.do";
pub const PLANTS: &Endpoint = "PlantListAPI.do";
pub const PLANT_INFO: &Endpoint = "newTwoPlantAPI.do";
pub const INVERTER: &Endpoint = "newInverterAPI.do";
pub const MIX: &Endpoint = "newMixApi.do";
pub const STORAGE: &Endpoint = "newStorageAPI.do";
/* The operation is part of the path here; the remaining parameters travel in the query */
pub const STORAGE_ENERGY_OVERVIEW: &Endpoint = "newStorageAPI.do?op=getEnergyOverviewData_sacolar";
pub const TLX: &Endpoint = "newTlxApi.do";

pub type Operation = str;

pub const OP_ALL_DEVICES: &Operation = "getAllDeviceList";
pub const OP_INVERTER_DETAIL: &Operation = "getInverterDetailData";
pub const OP_MIX_STATUS: &Operation = "getSystemStatus_KW";
pub const OP_STORAGE_PARAMS: &Operation = "getStorageParams_sacolar";
pub const OP_TLX_DETAIL: &Operation = "getTlxDetailData";
